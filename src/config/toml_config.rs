use crate::core::display::DisplaySettings;
use crate::core::species::{SpeciesRateTable, DEFAULT_CUSTOM_RATE};
use crate::domain::model::{Species, VolumeUnit};
use crate::domain::ports::{ConfigProvider, RateProvider};
use crate::utils::error::{CalcError, Result};
use crate::utils::validation::{validate_positive_rate, validate_required_field, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional configuration file. Every section and key may be omitted.
///
/// ```toml
/// [species_rates]
/// e_coli = 2.0
///
/// [display]
/// ml_decimals = 2
///
/// [defaults]
/// volume_unit = "L"
/// species = "Custom"
/// custom_rate = 0.7
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TomlConfig {
    pub species_rates: SpeciesRateTable,
    pub display: DisplaySettings,
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    pub volume_unit: VolumeUnit,
    pub species: Species,
    pub custom_rate: Option<f64>,
}

impl TomlConfig {
    /// Loads and parses a configuration file. Call `validate` before use.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CalcError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CalcError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CalcError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        self.species_rates.validate()?;
        self.display.validate()?;

        if let Some(rate) = self.defaults.custom_rate {
            validate_positive_rate("defaults.custom_rate", rate)?;
        }

        // a Custom default is only usable with a rate to go with it
        if self.defaults.species.is_custom() {
            validate_required_field("defaults.custom_rate", &self.defaults.custom_rate)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn rates(&self) -> &dyn RateProvider {
        &self.species_rates
    }

    fn display_settings(&self) -> DisplaySettings {
        self.display
    }

    fn default_volume_unit(&self) -> VolumeUnit {
        self.defaults.volume_unit
    }

    fn default_species(&self) -> Species {
        self.defaults.species
    }

    fn default_custom_rate(&self) -> f64 {
        self.defaults.custom_rate.unwrap_or(DEFAULT_CUSTOM_RATE)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
