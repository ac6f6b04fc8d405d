use crate::core::input::parse_number;
use crate::domain::model::{
    DilutionErrorKind, DilutionInput, DilutionResult, DilutionVolumes, VolumeUnit,
};

/// Computes how much dense culture and how much media to combine so the
/// mixture reaches the target OD at the requested final volume.
#[derive(Debug, Clone, Copy, Default)]
pub struct DilutionCalculator;

impl DilutionCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Pure and total: every input maps to a result, failures are values.
    pub fn compute(&self, input: &DilutionInput) -> DilutionResult {
        let final_volume_ml = input.final_volume_ml();

        // written positively so NaN fails, and an infinite volume is refused
        let positive = input.culture_od > 0.0
            && input.target_od > 0.0
            && final_volume_ml > 0.0
            && final_volume_ml.is_finite();
        if !positive {
            return DilutionResult::Invalid(DilutionErrorKind::NonPositiveInput);
        }

        if input.culture_od <= input.target_od {
            return DilutionResult::Invalid(DilutionErrorKind::TargetNotBelowCulture);
        }

        // C1 * V1 = C2 * V2; the ratio is below one so the product cannot overflow
        let culture_volume_ml = final_volume_ml * (input.target_od / input.culture_od);
        let media_volume_ml = final_volume_ml - culture_volume_ml;

        DilutionResult::Ok(DilutionVolumes {
            culture_volume_ml,
            media_volume_ml,
        })
    }

    /// Entry point for raw form text. Any field that does not read as a
    /// number yet gives `Incomplete` rather than a validation error.
    pub fn compute_raw(
        &self,
        culture_od: &str,
        target_od: &str,
        final_volume: &str,
        volume_unit: VolumeUnit,
    ) -> DilutionResult {
        let (Some(culture_od), Some(target_od), Some(final_volume)) = (
            parse_number(culture_od),
            parse_number(target_od),
            parse_number(final_volume),
        ) else {
            return DilutionResult::Incomplete;
        };

        self.compute(&DilutionInput {
            culture_od,
            target_od,
            final_volume,
            volume_unit,
        })
    }
}
