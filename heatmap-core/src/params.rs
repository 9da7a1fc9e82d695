//! Simulation parameters and the quantities derived from them.
//!
//! The time step is never chosen by the caller: it is always derived from the
//! grid spacing and the diffusivity so that the explicit 5-point scheme stays
//! at its stability bound.

use crate::error::{Result, SolverError};
use serde::{Deserialize, Serialize};

/// Largest diffusion number for which the explicit 5-point update is stable.
pub const STABILITY_LIMIT: f64 = 0.25;

/// Relative slack allowed on [`STABILITY_LIMIT`] for floating-point rounding
/// in the Δt / γ derivation.
const STABILITY_RTOL: f64 = 1e-12;

/// How the stencil walks the interior grid indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteriorStride {
    /// Visit every interior cell.
    #[default]
    Unit,
    /// Step interior rows and columns by the spatial step taken as an integer.
    /// Cells that are stepped over keep their fill value for the whole run.
    SpatialStep,
}

/// Plain, unvalidated form of [`SimulationParameters`], used for
/// (de)serialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSpec {
    pub diffusivity: f64,
    pub spatial_step: f64,
    pub max_time_steps: usize,
    pub plate_length: usize,
    pub stride: InteriorStride,
}

impl Default for ParameterSpec {
    fn default() -> Self {
        ParameterSpec {
            diffusivity: 2.0,
            spatial_step: 1.0,
            max_time_steps: 500,
            plate_length: 50,
            stride: InteriorStride::Unit,
        }
    }
}

/// Validated simulation parameters. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ParameterSpec", into = "ParameterSpec")]
pub struct SimulationParameters {
    diffusivity: f64,
    spatial_step: f64,
    max_time_steps: usize,
    plate_length: usize,
    stride: InteriorStride,
    time_step: f64,
    diffusion_number: f64,
}

impl SimulationParameters {
    pub fn new(
        diffusivity: f64,
        spatial_step: f64,
        max_time_steps: usize,
        plate_length: usize,
    ) -> Result<Self> {
        Self::from_spec(ParameterSpec {
            diffusivity,
            spatial_step,
            max_time_steps,
            plate_length,
            stride: InteriorStride::Unit,
        })
    }

    pub fn from_spec(spec: ParameterSpec) -> Result<Self> {
        validate(&spec)?;

        let dx2 = spec.spatial_step * spec.spatial_step;
        let time_step = dx2 / (4.0 * spec.diffusivity);
        let diffusion_number = spec.diffusivity * time_step / dx2;

        if !(time_step.is_finite() && time_step > 0.0) {
            let name = if dx2.is_finite() && dx2 > 0.0 {
                "diffusivity"
            } else {
                "spatial_step"
            };
            return Err(SolverError::invalid(
                name,
                format!(
                    "derived time step dx^2 / (4 alpha) = {time_step} is not a positive finite number"
                ),
            ));
        }
        if !(diffusion_number <= STABILITY_LIMIT * (1.0 + STABILITY_RTOL)) {
            return Err(SolverError::Unstable { diffusion_number });
        }

        Ok(SimulationParameters {
            diffusivity: spec.diffusivity,
            spatial_step: spec.spatial_step,
            max_time_steps: spec.max_time_steps,
            plate_length: spec.plate_length,
            stride: spec.stride,
            time_step,
            diffusion_number,
        })
    }

    /// Same parameters with a different interior stride.
    pub fn with_stride(&self, stride: InteriorStride) -> Result<Self> {
        let mut spec = self.spec();
        spec.stride = stride;
        Self::from_spec(spec)
    }

    pub fn spec(&self) -> ParameterSpec {
        ParameterSpec {
            diffusivity: self.diffusivity,
            spatial_step: self.spatial_step,
            max_time_steps: self.max_time_steps,
            plate_length: self.plate_length,
            stride: self.stride,
        }
    }

    pub fn diffusivity(&self) -> f64 {
        self.diffusivity
    }

    pub fn spatial_step(&self) -> f64 {
        self.spatial_step
    }

    pub fn max_time_steps(&self) -> usize {
        self.max_time_steps
    }

    pub fn plate_length(&self) -> usize {
        self.plate_length
    }

    pub fn stride(&self) -> InteriorStride {
        self.stride
    }

    /// Δt = Δx² / (4α)
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// γ = α·Δt / Δx²
    pub fn diffusion_number(&self) -> f64 {
        self.diffusion_number
    }

    /// Grid-index stride of the interior loops.
    pub fn index_stride(&self) -> usize {
        match self.stride {
            InteriorStride::Unit => 1,
            // validated to be an integer >= 1
            InteriorStride::SpatialStep => self.spatial_step as usize,
        }
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        let spec = ParameterSpec::default();
        let time_step = spec.spatial_step * spec.spatial_step / (4.0 * spec.diffusivity);
        SimulationParameters {
            diffusivity: spec.diffusivity,
            spatial_step: spec.spatial_step,
            max_time_steps: spec.max_time_steps,
            plate_length: spec.plate_length,
            stride: spec.stride,
            time_step,
            diffusion_number: STABILITY_LIMIT,
        }
    }
}

impl TryFrom<ParameterSpec> for SimulationParameters {
    type Error = SolverError;

    fn try_from(spec: ParameterSpec) -> Result<Self> {
        Self::from_spec(spec)
    }
}

impl From<SimulationParameters> for ParameterSpec {
    fn from(params: SimulationParameters) -> Self {
        params.spec()
    }
}

fn validate(spec: &ParameterSpec) -> Result<()> {
    if !spec.diffusivity.is_finite() || spec.diffusivity <= 0.0 {
        return Err(SolverError::invalid(
            "diffusivity",
            format!("must be a positive finite number, got {}", spec.diffusivity),
        ));
    }
    if !spec.spatial_step.is_finite() || spec.spatial_step <= 0.0 {
        return Err(SolverError::invalid(
            "spatial_step",
            format!("must be a positive finite number, got {}", spec.spatial_step),
        ));
    }
    if spec.max_time_steps < 1 {
        return Err(SolverError::invalid("max_time_steps", "must be >= 1"));
    }
    if spec.plate_length < 3 {
        return Err(SolverError::invalid(
            "plate_length",
            format!("must be >= 3, got {}", spec.plate_length),
        ));
    }
    if spec
        .plate_length
        .checked_mul(spec.plate_length)
        .and_then(|cells| cells.checked_mul(spec.max_time_steps))
        .and_then(|cells| cells.checked_mul(std::mem::size_of::<f64>()))
        .is_none_or(|bytes| bytes > isize::MAX as usize)
    {
        return Err(SolverError::invalid(
            "plate_length",
            format!(
                "field of {} layers of {}x{} cells does not fit in memory",
                spec.max_time_steps, spec.plate_length, spec.plate_length
            ),
        ));
    }
    if spec.stride == InteriorStride::SpatialStep
        && (spec.spatial_step < 1.0 || spec.spatial_step.fract() != 0.0)
    {
        return Err(SolverError::invalid(
            "spatial_step",
            format!(
                "must be a whole number >= 1 when used as the interior stride, got {}",
                spec.spatial_step
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn reference_defaults_derive_quarter_gamma() {
        let p = SimulationParameters::new(2.0, 1.0, 500, 50).unwrap();
        assert_eq!(p.time_step(), 0.125);
        assert_eq!(p.diffusion_number(), 0.25);
        assert_eq!(p, SimulationParameters::default());
    }

    #[test]
    fn gamma_is_a_quarter_across_parameter_range() {
        for &alpha in &[0.01, 0.3, 1.0, 2.0, 3.0, 7.5, 1e3] {
            for &dx in &[0.01, 0.1, 0.5, 1.0, 2.0, 3.0, 10.0] {
                let p = SimulationParameters::new(alpha, dx, 2, 3).unwrap();
                assert_abs_diff_eq!(p.time_step(), dx * dx / (4.0 * alpha), epsilon = 1e-12);
                assert_abs_diff_eq!(p.diffusion_number(), 0.25, epsilon = 1e-15);
            }
        }
    }

    #[test]
    fn rejects_bad_inputs() {
        let cases = [
            (0.0, 1.0, 10, 10, "diffusivity"),
            (-1.0, 1.0, 10, 10, "diffusivity"),
            (f64::NAN, 1.0, 10, 10, "diffusivity"),
            (1.0, 0.0, 10, 10, "spatial_step"),
            (1.0, f64::INFINITY, 10, 10, "spatial_step"),
            (1.0, 1.0, 0, 10, "max_time_steps"),
            (1.0, 1.0, 10, 2, "plate_length"),
            (1.0, 1e-200, 3, 4, "spatial_step"),
            (1.0, 1e200, 3, 4, "spatial_step"),
            (1e-320, 1.0, 3, 4, "diffusivity"),
            (1.0, 1.0, 2, usize::MAX / 2, "plate_length"),
            (1.0, 1.0, usize::MAX, 1 << 20, "plate_length"),
            (1.0, 1.0, usize::MAX / 8, 3, "plate_length"),
        ];
        for (alpha, dx, t, n, field) in cases {
            match SimulationParameters::new(alpha, dx, t, n) {
                Err(SolverError::InvalidParameter { name, .. }) => assert_eq!(name, field),
                other => panic!("expected InvalidParameter for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn spatial_step_stride_requires_whole_number() {
        let p = SimulationParameters::new(1.0, 1.5, 10, 10).unwrap();
        assert!(matches!(
            p.with_stride(InteriorStride::SpatialStep),
            Err(SolverError::InvalidParameter { name: "spatial_step", .. })
        ));

        let p = SimulationParameters::new(1.0, 2.0, 10, 10)
            .unwrap()
            .with_stride(InteriorStride::SpatialStep)
            .unwrap();
        assert_eq!(p.index_stride(), 2);
        assert_eq!(SimulationParameters::new(1.0, 2.0, 10, 10).unwrap().index_stride(), 1);
    }

    #[test]
    fn json_round_trip_goes_through_validation() {
        let p: SimulationParameters = serde_json::from_str(
            r#"{"diffusivity": 1.0, "spatial_step": 1.0, "max_time_steps": 3, "plate_length": 4}"#,
        )
        .unwrap();
        assert_eq!(p.time_step(), 0.25);
        assert_eq!(p.stride(), InteriorStride::Unit);

        let json = serde_json::to_value(&p).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.get("max_time_steps"), Some(&serde_json::json!(3)));
        assert!(obj.get("time_step").is_none());
        assert!(obj.get("diffusion_number").is_none());

        let bad = serde_json::from_str::<SimulationParameters>(r#"{"plate_length": 1}"#);
        assert!(bad.is_err());
    }
}
