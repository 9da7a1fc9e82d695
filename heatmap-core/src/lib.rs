//! Explicit finite-difference solver for transient heat diffusion on a square
//! plate with constant (Dirichlet) borders.
//!
//! ```
//! use heatmap_core::HeatSolver;
//!
//! let mut solver = HeatSolver::initialize(2.0, 1.0, 100, 20)?;
//! solver.create_field();
//! solver.set_borders(0.0, (100.0, 70.0, 20.0, 10.0))?;
//! solver.calculate()?;
//!
//! let last = solver.layer(99)?;
//! assert_eq!(last.get(19, 5), 100.0);
//! # Ok::<(), heatmap_core::SolverError>(())
//! ```

pub mod borders;
pub mod error;
pub mod field;
pub mod params;
pub mod solver;

pub use borders::{BorderPlan, BorderValues, Region};
pub use error::{Result, SolverError};
pub use field::{LayerView, TemperatureField};
pub use params::{InteriorStride, ParameterSpec, SimulationParameters, STABILITY_LIMIT};
pub use solver::{HeatSolver, SolverState};
