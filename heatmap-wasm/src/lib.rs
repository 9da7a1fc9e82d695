use heatmap_core::{HeatSolver, SolverError};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct HeatMap {
    inner: HeatSolver,
}

#[wasm_bindgen]
impl HeatMap {
    #[wasm_bindgen(constructor)]
    pub fn new(
        diffusivity: f64,
        spatial_step: f64,
        max_time_steps: usize,
        plate_length: usize,
    ) -> Result<HeatMap, JsValue> {
        let inner = HeatSolver::initialize(diffusivity, spatial_step, max_time_steps, plate_length)
            .map_err(to_js)?;
        Ok(HeatMap { inner })
    }

    // Lifecycle
    pub fn create_field(&mut self) { self.inner.create_field(); }

    pub fn set_borders(
        &mut self,
        initial: f64,
        top: f64,
        left: f64,
        bottom: f64,
        right: f64,
    ) -> Result<(), JsValue> {
        self.inner
            .set_borders(initial, (top, left, bottom, right))
            .map_err(to_js)
    }

    /// Runs the solver and reports wall time in milliseconds.
    pub fn calculate(&mut self) -> Result<f64, JsValue> {
        let t0 = now_ms();
        self.inner.calculate().map_err(to_js)?;
        Ok(now_ms() - t0)
    }

    // Read interface for the page-side renderer
    pub fn time_step(&self) -> f64 { self.inner.time_step() }
    pub fn diffusion_number(&self) -> f64 { self.inner.diffusion_number() }
    pub fn plate_length(&self) -> usize { self.inner.plate_length() }
    pub fn max_time_steps(&self) -> usize { self.inner.max_time_steps() }
    pub fn time_at(&self, k: usize) -> f64 { self.inner.time_at(k) }

    // Copy-based JS access
    pub fn get_layer(&self, k: usize) -> Result<Vec<f64>, JsValue> {
        self.inner.layer(k).map(|v| v.to_vec()).map_err(to_js)
    }
}

fn to_js(e: SolverError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
