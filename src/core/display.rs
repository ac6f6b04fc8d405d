//! Presentation rules shared by every front end: unit rescaling, fixed
//! decimal places and the text shown for each outcome.

use crate::domain::model::{DilutionResult, GrowthEstimate, GrowthResult, OutcomeStatus};
use crate::utils::error::Result;
use crate::utils::validation::{validate_range, Validate};
use serde::{Deserialize, Serialize};

const MAX_DECIMALS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySettings {
    pub ml_decimals: usize,
    pub ul_decimals: usize,
    pub hours_decimals: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            ml_decimals: 3,
            ul_decimals: 1,
            hours_decimals: 2,
        }
    }
}

impl Validate for DisplaySettings {
    fn validate(&self) -> Result<()> {
        validate_range("display.ml_decimals", self.ml_decimals, 0, MAX_DECIMALS)?;
        validate_range("display.ul_decimals", self.ul_decimals, 0, MAX_DECIMALS)?;
        validate_range("display.hours_decimals", self.hours_decimals, 0, MAX_DECIMALS)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DisplayUnit {
    #[serde(rename = "mL")]
    Milliliters,
    #[serde(rename = "µL")]
    Microliters,
}

impl DisplayUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            DisplayUnit::Milliliters => "mL",
            DisplayUnit::Microliters => "µL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplayVolume {
    pub value: f64,
    pub unit: DisplayUnit,
}

impl DisplayVolume {
    /// Culture volumes below 1 mL are shown in µL.
    pub fn culture(volume_ml: f64) -> Self {
        if volume_ml > 0.0 && volume_ml < 1.0 {
            Self {
                value: volume_ml * 1000.0,
                unit: DisplayUnit::Microliters,
            }
        } else {
            Self::media(volume_ml)
        }
    }

    pub fn media(volume_ml: f64) -> Self {
        Self {
            value: volume_ml,
            unit: DisplayUnit::Milliliters,
        }
    }

    pub fn format(&self, settings: &DisplaySettings) -> String {
        let decimals = match self.unit {
            DisplayUnit::Milliliters => settings.ml_decimals,
            DisplayUnit::Microliters => settings.ul_decimals,
        };
        format!("{} {}", fixed(self.value, decimals), self.unit.symbol())
    }
}

/// Non-positive values print as zero at the requested precision.
fn fixed(value: f64, decimals: usize) -> String {
    let value = if value > 0.0 { value } else { 0.0 };
    format!("{:.*}", decimals, value)
}

pub fn format_hours(hours: f64, settings: &DisplaySettings) -> String {
    format!("{} h", fixed(hours, settings.hours_decimals))
}

/// "1.15 h", or "10:09 (1.15 h)" when an arrival time was projected.
pub fn format_growth(estimate: &GrowthEstimate, settings: &DisplaySettings) -> String {
    let hours = format_hours(estimate.elapsed_hours, settings);
    match estimate.arrival {
        Some(arrival) => format!("{} ({})", arrival.time.format("%H:%M"), hours),
        None => hours,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DilutionReport {
    pub status: OutcomeStatus,
    pub culture_volume_ml: f64,
    pub media_volume_ml: f64,
    pub culture: String,
    pub media: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DilutionReport {
    pub fn new(result: &DilutionResult, settings: &DisplaySettings) -> Self {
        Self {
            status: result.status(),
            culture_volume_ml: result.culture_volume_ml(),
            media_volume_ml: result.media_volume_ml(),
            culture: DisplayVolume::culture(result.culture_volume_ml()).format(settings),
            media: DisplayVolume::media(result.media_volume_ml()).format(settings),
            message: result.error_kind().map(|kind| kind.to_string()),
        }
    }

    pub fn render_text(&self) -> String {
        match &self.message {
            Some(message) => message.clone(),
            None => format!(
                "Culture to add: {}\nMedia to add:   {}",
                self.culture, self.media
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthReport {
    pub status: OutcomeStatus,
    pub elapsed_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_day_offset: Option<i64>,
    pub eta: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GrowthReport {
    pub fn new(result: &GrowthResult, settings: &DisplaySettings) -> Self {
        let arrival = result.arrival_clock_time();
        Self {
            status: result.status(),
            elapsed_hours: result.elapsed_hours(),
            arrival: arrival.map(|a| a.time.format("%H:%M").to_string()),
            arrival_day_offset: arrival.map(|a| a.day_offset),
            eta: result
                .estimate()
                .map(|e| format_growth(e, settings))
                .unwrap_or_default(),
            message: result.error_kind().map(|kind| kind.to_string()),
        }
    }

    pub fn render_text(&self) -> String {
        match (&self.message, self.status) {
            (Some(message), _) => message.clone(),
            (None, OutcomeStatus::Incomplete) => "Estimated time: --".to_string(),
            (None, _) => format!("Estimated time: {}", self.eta),
        }
    }
}
