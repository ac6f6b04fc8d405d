use crate::core::display::DisplaySettings;
use crate::domain::model::{Species, VolumeUnit};

/// Source of per-species exponential growth rates (per hour).
pub trait RateProvider {
    /// Tabulated rate for `species`, or `None` for the `Custom` sentinel.
    fn rate_for(&self, species: Species) -> Option<f64>;
}

pub trait ConfigProvider {
    fn rates(&self) -> &dyn RateProvider;
    fn display_settings(&self) -> DisplaySettings;
    fn default_volume_unit(&self) -> VolumeUnit;
    fn default_species(&self) -> Species;
    fn default_custom_rate(&self) -> f64;
}

impl<T: RateProvider + ?Sized> RateProvider for &T {
    fn rate_for(&self, species: Species) -> Option<f64> {
        (**self).rate_for(species)
    }
}
