pub mod invoke;
pub mod model;

pub use invoke::{invoke, PredictionResult, SKILL_COLUMNS};
pub use model::{LinearLogitModel, Model, ModelError};
