//! Raw form state. Every edit replaces one field and the result is
//! recomputed from the latest snapshot, so the last write always wins.

use crate::core::dilution::DilutionCalculator;
use crate::core::display::{DilutionReport, DisplaySettings, GrowthReport};
use crate::core::growth::{GrowthTimeEstimator, RawGrowthInput};
use crate::domain::model::{DilutionResult, GrowthResult, Species, VolumeUnit};
use crate::domain::ports::RateProvider;
use crate::utils::error::{CalcError, Result};
use std::io::{BufRead, Write};

pub trait Form {
    /// Sets one field from its text value.
    fn apply(&mut self, field: &str, value: &str) -> Result<()>;
    fn reset(&mut self);
    fn render(&self, settings: &DisplaySettings) -> String;
    fn fields(&self) -> &'static [&'static str];
}

#[derive(Debug, Clone, PartialEq)]
pub struct DilutionForm {
    pub culture_od: String,
    pub target_od: String,
    pub final_volume: String,
    pub volume_unit: VolumeUnit,
    default_unit: VolumeUnit,
}

impl DilutionForm {
    pub fn new(default_unit: VolumeUnit) -> Self {
        Self {
            culture_od: String::new(),
            target_od: String::new(),
            final_volume: String::new(),
            volume_unit: default_unit,
            default_unit,
        }
    }

    pub fn result(&self) -> DilutionResult {
        DilutionCalculator::new().compute_raw(
            &self.culture_od,
            &self.target_od,
            &self.final_volume,
            self.volume_unit,
        )
    }
}

impl Default for DilutionForm {
    fn default() -> Self {
        Self::new(VolumeUnit::default())
    }
}

impl Form for DilutionForm {
    fn apply(&mut self, field: &str, value: &str) -> Result<()> {
        match field {
            "culture_od" | "culture" => self.culture_od = value.to_string(),
            "target_od" | "target" => self.target_od = value.to_string(),
            "final_volume" | "volume" => self.final_volume = value.to_string(),
            "unit" => self.volume_unit = value.parse()?,
            other => return Err(unknown_field(other, self.fields())),
        }
        Ok(())
    }

    fn reset(&mut self) {
        *self = Self::new(self.default_unit);
    }

    fn render(&self, settings: &DisplaySettings) -> String {
        DilutionReport::new(&self.result(), settings).render_text()
    }

    fn fields(&self) -> &'static [&'static str] {
        &["culture_od", "target_od", "final_volume", "unit"]
    }
}

#[derive(Debug, Clone)]
pub struct GrowthForm<R: RateProvider> {
    pub start_od: String,
    pub target_od: String,
    pub species: Species,
    pub custom_rate: String,
    pub start_time: String,
    default_species: Species,
    default_custom_rate: f64,
    estimator: GrowthTimeEstimator<R>,
}

impl<R: RateProvider> GrowthForm<R> {
    pub fn new(rates: R, default_species: Species, default_custom_rate: f64) -> Self {
        Self {
            start_od: String::new(),
            target_od: String::new(),
            species: default_species,
            custom_rate: format_rate(default_custom_rate),
            start_time: String::new(),
            default_species,
            default_custom_rate,
            estimator: GrowthTimeEstimator::new(rates),
        }
    }

    pub fn result(&self) -> GrowthResult {
        self.estimator.estimate_raw(&RawGrowthInput {
            start_od: &self.start_od,
            target_od: &self.target_od,
            species: self.species,
            custom_rate: Some(&self.custom_rate),
            start_time: Some(&self.start_time),
        })
    }
}

impl<R: RateProvider> Form for GrowthForm<R> {
    fn apply(&mut self, field: &str, value: &str) -> Result<()> {
        match field {
            "start_od" | "start" => self.start_od = value.to_string(),
            "target_od" | "target" => self.target_od = value.to_string(),
            "species" => self.species = value.parse()?,
            "custom_rate" | "rate" => self.custom_rate = value.to_string(),
            "start_time" | "time" => self.start_time = value.to_string(),
            other => return Err(unknown_field(other, self.fields())),
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.start_od.clear();
        self.target_od.clear();
        self.start_time.clear();
        self.species = self.default_species;
        self.custom_rate = format_rate(self.default_custom_rate);
    }

    fn render(&self, settings: &DisplaySettings) -> String {
        GrowthReport::new(&self.result(), settings).render_text()
    }

    fn fields(&self) -> &'static [&'static str] {
        &["start_od", "target_od", "species", "custom_rate", "start_time"]
    }
}

// 1.0 shows as "1.0", like the form's initial text
fn format_rate(rate: f64) -> String {
    format!("{:?}", rate)
}

fn unknown_field(field: &str, known: &[&str]) -> CalcError {
    CalcError::invalid_input(
        "field",
        format!("unknown field '{}', expected one of: {}", field, known.join(", ")),
    )
}

/// Line-oriented editing loop: `field=value` edits a field, `reset` clears
/// the form, `quit` ends the session. The result is re-rendered after every
/// edit.
pub fn run_session<F, I, O>(
    form: &mut F,
    settings: &DisplaySettings,
    input: I,
    mut output: O,
) -> Result<()>
where
    F: Form,
    I: BufRead,
    O: Write,
{
    writeln!(
        output,
        "Fields: {}. Type field=value, 'reset' or 'quit'.",
        form.fields().join(", ")
    )?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();

        match line {
            "" => continue,
            "quit" | "exit" => break,
            "reset" => {
                form.reset();
                tracing::debug!("Form reset");
            }
            _ => {
                let Some((field, value)) = line.split_once('=') else {
                    writeln!(output, "Expected field=value, got '{}'", line)?;
                    continue;
                };
                if let Err(e) = form.apply(field.trim(), value.trim()) {
                    writeln!(output, "{}", e.user_friendly_message())?;
                    continue;
                }
                tracing::debug!("Field '{}' set to '{}'", field.trim(), value.trim());
            }
        }

        writeln!(output, "{}", form.render(settings))?;
    }

    Ok(())
}
