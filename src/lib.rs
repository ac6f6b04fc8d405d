pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use crate::core::{
    dilution::DilutionCalculator,
    growth::{resolve_rate, GrowthTimeEstimator, RawGrowthInput},
    species::SpeciesRateTable,
};
pub use domain::model::{ClockTime, Species, VolumeUnit};
pub use utils::error::{CalcError, Result};
