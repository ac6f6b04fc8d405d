use crate::utils::error::{CalcError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unit the final volume was entered in. Calculations always run in mL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VolumeUnit {
    #[default]
    #[serde(rename = "mL", alias = "ml", alias = "ML")]
    Milliliters,
    #[serde(rename = "L", alias = "l")]
    Liters,
}

impl VolumeUnit {
    pub fn to_ml(self, value: f64) -> f64 {
        match self {
            VolumeUnit::Milliliters => value,
            VolumeUnit::Liters => value * 1000.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            VolumeUnit::Milliliters => "mL",
            VolumeUnit::Liters => "L",
        }
    }
}

impl fmt::Display for VolumeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for VolumeUnit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ml" => Ok(VolumeUnit::Milliliters),
            "l" => Ok(VolumeUnit::Liters),
            other => Err(CalcError::invalid_input(
                "unit",
                format!("unknown volume unit '{}', expected mL or L", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DilutionInput {
    pub culture_od: f64,
    pub target_od: f64,
    pub final_volume: f64,
    pub volume_unit: VolumeUnit,
}

impl DilutionInput {
    pub fn final_volume_ml(&self) -> f64 {
        self.volume_unit.to_ml(self.final_volume)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DilutionErrorKind {
    #[error("All values must be positive.")]
    NonPositiveInput,
    #[error("Culture OD must be greater than Target OD.")]
    TargetNotBelowCulture,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DilutionVolumes {
    pub culture_volume_ml: f64,
    pub media_volume_ml: f64,
}

/// Outcome of one dilution recomputation.
///
/// `Incomplete` means at least one field could not be read as a number yet,
/// which is not an error: the user may still be typing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DilutionResult {
    Incomplete,
    Invalid(DilutionErrorKind),
    Ok(DilutionVolumes),
}

impl DilutionResult {
    pub fn culture_volume_ml(&self) -> f64 {
        match self {
            DilutionResult::Ok(v) => v.culture_volume_ml,
            _ => 0.0,
        }
    }

    pub fn media_volume_ml(&self) -> f64 {
        match self {
            DilutionResult::Ok(v) => v.media_volume_ml,
            _ => 0.0,
        }
    }

    pub fn error_kind(&self) -> Option<DilutionErrorKind> {
        match self {
            DilutionResult::Invalid(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn volumes(&self) -> Option<&DilutionVolumes> {
        match self {
            DilutionResult::Ok(v) => Some(v),
            _ => None,
        }
    }

    pub fn status(&self) -> OutcomeStatus {
        match self {
            DilutionResult::Incomplete => OutcomeStatus::Incomplete,
            DilutionResult::Invalid(_) => OutcomeStatus::Invalid,
            DilutionResult::Ok(_) => OutcomeStatus::Ok,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Ok,
    Invalid,
    Incomplete,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutcomeStatus::Ok => "ok",
            OutcomeStatus::Invalid => "invalid",
            OutcomeStatus::Incomplete => "incomplete",
        })
    }
}

/// Organisms with a tabulated growth rate, plus the `Custom` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Species {
    #[default]
    #[serde(rename = "E. coli", alias = "e_coli", alias = "ecoli")]
    EColi,
    #[serde(rename = "S. cerevisiae", alias = "s_cerevisiae", alias = "yeast")]
    SCerevisiae,
    #[serde(rename = "B. subtilis", alias = "b_subtilis", alias = "bsubtilis")]
    BSubtilis,
    #[serde(rename = "Custom", alias = "custom")]
    Custom,
}

impl Species {
    pub const ALL: [Species; 4] = [
        Species::EColi,
        Species::SCerevisiae,
        Species::BSubtilis,
        Species::Custom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Species::EColi => "E. coli",
            Species::SCerevisiae => "S. cerevisiae",
            Species::BSubtilis => "B. subtilis",
            Species::Custom => "Custom",
        }
    }

    pub fn is_custom(self) -> bool {
        self == Species::Custom
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Species {
    type Err = CalcError;

    /// Accepts the display name or any spelling that matches it once dots,
    /// spaces and underscores are dropped ("E. coli", "ecoli", "e_coli").
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '.' | ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "ecoli" => Ok(Species::EColi),
            "scerevisiae" | "yeast" => Ok(Species::SCerevisiae),
            "bsubtilis" => Ok(Species::BSubtilis),
            "custom" => Ok(Species::Custom),
            _ => Err(CalcError::invalid_input(
                "species",
                format!(
                    "unknown species '{}', expected one of: {}",
                    s.trim(),
                    Species::ALL.map(Species::name).join(", ")
                ),
            )),
        }
    }
}

/// Time of day with minute resolution; seconds are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClockTime {
    time: NaiveTime,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        NaiveTime::from_hms_opt(hour.into(), minute.into(), 0).map(|time| Self { time })
    }

    pub fn hour(&self) -> u8 {
        self.time.hour() as u8
    }

    pub fn minute(&self) -> u8 {
        self.time.minute() as u8
    }

    pub fn to_naive_time(self) -> NaiveTime {
        self.time
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.time.format("%H:%M"))
    }
}

impl FromStr for ClockTime {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        let time = NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|e| {
            CalcError::invalid_input("start_time", format!("expected HH:MM, got '{}' ({})", s, e))
        })?;
        Ok(Self { time })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthInput {
    pub start_od: f64,
    pub target_od: f64,
    pub rate_per_hour: f64,
    pub start_clock_time: Option<ClockTime>,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthErrorKind {
    #[error("Enter valid values (target OD > start OD > 0, rate > 0)")]
    InvalidGrowthParameters,
}

/// Projected wall-clock arrival. `day_offset` counts the midnights crossed
/// since the start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArrivalTime {
    pub time: NaiveTime,
    pub day_offset: i64,
}

impl ArrivalTime {
    /// Anchors the arrival to the calendar date the culture was started on.
    /// `None` when the arrival falls outside the representable calendar.
    pub fn on(&self, start_date: NaiveDate) -> Option<NaiveDateTime> {
        let days = Duration::try_days(self.day_offset)?;
        start_date.and_time(self.time).checked_add_signed(days)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GrowthEstimate {
    pub elapsed_hours: f64,
    pub arrival: Option<ArrivalTime>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrowthResult {
    Incomplete,
    Invalid(GrowthErrorKind),
    Ok(GrowthEstimate),
}

impl GrowthResult {
    pub fn elapsed_hours(&self) -> f64 {
        match self {
            GrowthResult::Ok(e) => e.elapsed_hours,
            _ => 0.0,
        }
    }

    pub fn arrival_clock_time(&self) -> Option<ArrivalTime> {
        match self {
            GrowthResult::Ok(e) => e.arrival,
            _ => None,
        }
    }

    pub fn error_kind(&self) -> Option<GrowthErrorKind> {
        match self {
            GrowthResult::Invalid(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn estimate(&self) -> Option<&GrowthEstimate> {
        match self {
            GrowthResult::Ok(e) => Some(e),
            _ => None,
        }
    }

    pub fn status(&self) -> OutcomeStatus {
        match self {
            GrowthResult::Incomplete => OutcomeStatus::Incomplete,
            GrowthResult::Invalid(_) => OutcomeStatus::Invalid,
            GrowthResult::Ok(_) => OutcomeStatus::Ok,
        }
    }
}
