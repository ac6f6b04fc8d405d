pub mod batch;
pub mod dilution;
pub mod display;
pub mod form;
pub mod growth;
pub mod input;
pub mod species;

pub use crate::domain::model::{DilutionInput, DilutionResult, GrowthInput, GrowthResult};
pub use crate::domain::ports::{ConfigProvider, RateProvider};
pub use crate::utils::error::Result;
