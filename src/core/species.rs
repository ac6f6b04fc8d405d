use crate::domain::model::Species;
use crate::domain::ports::RateProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_rate, Validate};
use serde::{Deserialize, Serialize};

/// Rate suggested for the `Custom` species before the user types their own.
pub const DEFAULT_CUSTOM_RATE: f64 = 1.0;

/// Fixed growth-rate table, one field per tabulated species (rates per hour).
///
/// New species are not registered at runtime; a TOML `[species_rates]`
/// section may only override the values below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpeciesRateTable {
    pub e_coli: f64,
    pub s_cerevisiae: f64,
    pub b_subtilis: f64,
}

impl Default for SpeciesRateTable {
    fn default() -> Self {
        Self {
            e_coli: 2.0,
            s_cerevisiae: 0.4,
            b_subtilis: 1.2,
        }
    }
}

impl RateProvider for SpeciesRateTable {
    fn rate_for(&self, species: Species) -> Option<f64> {
        match species {
            Species::EColi => Some(self.e_coli),
            Species::SCerevisiae => Some(self.s_cerevisiae),
            Species::BSubtilis => Some(self.b_subtilis),
            Species::Custom => None,
        }
    }
}

impl Validate for SpeciesRateTable {
    fn validate(&self) -> Result<()> {
        validate_positive_rate("species_rates.e_coli", self.e_coli)?;
        validate_positive_rate("species_rates.s_cerevisiae", self.s_cerevisiae)?;
        validate_positive_rate("species_rates.b_subtilis", self.b_subtilis)?;
        Ok(())
    }
}
