use crate::borders::{BorderPlan, BorderValues};
use crate::error::{Result, SolverError};
use crate::field::{LayerView, TemperatureField};
use crate::params::SimulationParameters;
use log::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Lifecycle of a [`HeatSolver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverState {
    Uninitialized,
    FieldCreated,
    BordersSet,
    Computed,
}

/// Explicit finite-difference solver for 2-D heat diffusion on a square plate.
#[derive(Clone, Debug)]
pub struct HeatSolver {
    params: SimulationParameters,
    field: Option<TemperatureField>,
    state: SolverState,
}

impl HeatSolver {
    pub fn new(params: SimulationParameters) -> Self {
        debug!(
            "solver: n={} layers={} dt={} gamma={}",
            params.plate_length(),
            params.max_time_steps(),
            params.time_step(),
            params.diffusion_number()
        );
        HeatSolver {
            params,
            field: None,
            state: SolverState::Uninitialized,
        }
    }

    pub fn initialize(
        diffusivity: f64,
        spatial_step: f64,
        max_time_steps: usize,
        plate_length: usize,
    ) -> Result<Self> {
        let params =
            SimulationParameters::new(diffusivity, spatial_step, max_time_steps, plate_length)?;
        Ok(Self::new(params))
    }

    // ---- Parameters ----

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn time_step(&self) -> f64 {
        self.params.time_step()
    }

    pub fn diffusion_number(&self) -> f64 {
        self.params.diffusion_number()
    }

    pub fn plate_length(&self) -> usize {
        self.params.plate_length()
    }

    pub fn max_time_steps(&self) -> usize {
        self.params.max_time_steps()
    }

    /// Simulated time of layer `k`.
    pub fn time_at(&self, k: usize) -> f64 {
        k as f64 * self.params.time_step()
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    // ---- Lifecycle ----

    pub fn create_field(&mut self) {
        self.create_field_with(0.0);
    }

    /// Allocates a fresh field filled with `value`, dropping any previous one.
    pub fn create_field_with(&mut self, value: f64) {
        let n = self.params.plate_length();
        let layers = self.params.max_time_steps();
        self.field = Some(TemperatureField::filled(layers, n, value));
        self.state = SolverState::FieldCreated;
        debug!("field created: ({layers}, {n}, {n}) filled with {value}");
    }

    /// Fills layer 0 with `initial_value`, then imposes the border plan on
    /// every layer.
    pub fn set_borders(&mut self, initial_value: f64, borders: impl Into<BorderValues>) -> Result<()> {
        const OP: &str = "set_borders";
        match self.state {
            SolverState::Uninitialized => {
                return Err(SolverError::UninitializedField {
                    operation: OP,
                    state: self.state,
                });
            }
            SolverState::Computed => return Err(SolverError::AlreadyComputed { operation: OP }),
            SolverState::FieldCreated | SolverState::BordersSet => {}
        }
        let field = self.field.as_mut().ok_or(SolverError::UninitializedField {
            operation: OP,
            state: self.state,
        })?;

        let borders = borders.into();
        if let Some(first) = field.layer_mut(0) {
            first.fill(initial_value);
        }
        BorderPlan::new(borders).apply(field);

        self.state = SolverState::BordersSet;
        debug!("borders set: initial={initial_value} {borders:?}");
        Ok(())
    }

    /// Runs the explicit update for every layer after the first.
    pub fn calculate(&mut self) -> Result<()> {
        const OP: &str = "calculate";
        match self.state {
            SolverState::Uninitialized | SolverState::FieldCreated => {
                return Err(SolverError::UninitializedField {
                    operation: OP,
                    state: self.state,
                });
            }
            SolverState::Computed => return Err(SolverError::AlreadyComputed { operation: OP }),
            SolverState::BordersSet => {}
        }
        let field = self.field.as_mut().ok_or(SolverError::UninitializedField {
            operation: OP,
            state: self.state,
        })?;

        let n = self.params.plate_length();
        let gamma = self.params.diffusion_number();
        let stride = self.params.index_stride();

        for k in 0..field.layers().saturating_sub(1) {
            let (prev, next) = field.layers_mut_pair(k);
            explicit_step(prev, next, n, gamma, stride);
        }

        self.state = SolverState::Computed;
        info!("computed {} layers of {n}x{n}", field.layers());
        Ok(())
    }

    /// `create_field`, `set_borders` and `calculate` in order.
    pub fn run(&mut self, initial_value: f64, borders: impl Into<BorderValues>) -> Result<()> {
        self.create_field();
        self.set_borders(initial_value, borders)?;
        self.calculate()
    }

    // ---- Accessors ----

    pub fn field(&self) -> Option<&TemperatureField> {
        self.field.as_ref()
    }

    pub fn into_field(self) -> Option<TemperatureField> {
        self.field
    }

    pub fn layer(&self, k: usize) -> Result<LayerView<'_>> {
        let field = self.field.as_ref().ok_or(SolverError::UninitializedField {
            operation: "layer",
            state: self.state,
        })?;
        field.layer_view(k).ok_or(SolverError::LayerOutOfRange {
            index: k,
            layers: field.layers(),
        })
    }
}

/// 5-point update of the interior of `next` from `prev`.
///
/// Rows and columns `1..=n-2` are visited with the given index stride; all
/// other cells of `next` are left untouched.
fn explicit_step(prev: &[f64], next: &mut [f64], n: usize, gamma: f64, stride: usize) {
    let update_row = |i: usize, row: &mut [f64]| {
        let base = i * n;
        for j in (1..n - 1).step_by(stride) {
            let c = base + j;
            let u = prev[c];
            let lap = prev[c + n] + prev[c - n] + prev[c + 1] + prev[c - 1] - 4.0 * u;
            row[j] = gamma * lap + u;
        }
    };
    let on_grid = |i: usize| i >= 1 && i < n - 1 && (i - 1) % stride == 0;

    #[cfg(feature = "parallel")]
    next.par_chunks_mut(n)
        .enumerate()
        .filter(|(i, _)| on_grid(*i))
        .for_each(|(i, row)| update_row(i, row));

    #[cfg(not(feature = "parallel"))]
    next.chunks_mut(n)
        .enumerate()
        .filter(|(i, _)| on_grid(*i))
        .for_each(|(i, row)| update_row(i, row));
}
