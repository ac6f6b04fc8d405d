use crate::core::input::parse_number;
use crate::core::species::SpeciesRateTable;
use crate::domain::model::{
    ArrivalTime, ClockTime, GrowthErrorKind, GrowthEstimate, GrowthInput, GrowthResult, Species,
};
use crate::domain::ports::RateProvider;
use chrono::Duration;
use thiserror::Error;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;
const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateError {
    #[error("a custom growth rate is required for species 'Custom'")]
    MissingCustomRate,
    #[error("custom growth rate '{0}' is not a number")]
    Unparseable(String),
}

/// Picks the growth rate for `species`: the table value for tabulated
/// organisms, otherwise the caller's custom rate text read verbatim.
pub fn resolve_rate<R: RateProvider + ?Sized>(
    rates: &R,
    species: Species,
    custom_rate: Option<&str>,
) -> std::result::Result<f64, RateError> {
    if !species.is_custom() {
        if let Some(rate) = rates.rate_for(species) {
            return Ok(rate);
        }
    }

    let raw = custom_rate
        .filter(|s| !s.trim().is_empty())
        .ok_or(RateError::MissingCustomRate)?;
    parse_number(raw).ok_or_else(|| RateError::Unparseable(raw.to_string()))
}

/// Raw text of the growth form, as the user typed it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawGrowthInput<'a> {
    pub start_od: &'a str,
    pub target_od: &'a str,
    pub species: Species,
    pub custom_rate: Option<&'a str>,
    pub start_time: Option<&'a str>,
}

/// Time for a culture to grow from one OD to another under
/// `OD(t) = OD0 * e^(rate * t)`.
#[derive(Debug, Clone)]
pub struct GrowthTimeEstimator<R: RateProvider> {
    rates: R,
}

impl Default for GrowthTimeEstimator<SpeciesRateTable> {
    fn default() -> Self {
        Self::new(SpeciesRateTable::default())
    }
}

impl<R: RateProvider> GrowthTimeEstimator<R> {
    pub fn new(rates: R) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &R {
        &self.rates
    }

    /// Pure and total: every input maps to a result, failures are values.
    pub fn estimate(&self, input: &GrowthInput) -> GrowthResult {
        let invalid = GrowthResult::Invalid(GrowthErrorKind::InvalidGrowthParameters);

        // written positively so NaN fails every comparison
        let valid = input.start_od > 0.0
            && input.target_od > input.start_od
            && input.rate_per_hour > 0.0;
        if !valid {
            return invalid;
        }

        let elapsed_hours = (input.target_od.ln() - input.start_od.ln()) / input.rate_per_hour;
        if !elapsed_hours.is_finite() || elapsed_hours < 0.0 {
            return invalid;
        }

        let arrival = match input.start_clock_time {
            None => None,
            Some(start) => match project_arrival(start, elapsed_hours) {
                Some(arrival) => Some(arrival),
                None => return invalid,
            },
        };

        GrowthResult::Ok(GrowthEstimate {
            elapsed_hours,
            arrival,
        })
    }

    /// Entry point for raw form text.
    ///
    /// Unreadable OD fields or custom rate give `Incomplete`. A blank start
    /// time means none was given; a malformed one is ignored and the result
    /// carries no arrival time.
    pub fn estimate_raw(&self, raw: &RawGrowthInput<'_>) -> GrowthResult {
        let (Some(start_od), Some(target_od)) =
            (parse_number(raw.start_od), parse_number(raw.target_od))
        else {
            return GrowthResult::Incomplete;
        };

        let Ok(rate_per_hour) = resolve_rate(&self.rates, raw.species, raw.custom_rate) else {
            return GrowthResult::Incomplete;
        };

        let start_clock_time = raw
            .start_time
            .filter(|s| !s.trim().is_empty())
            .and_then(|s| s.parse::<ClockTime>().ok());

        self.estimate(&GrowthInput {
            start_od,
            target_od,
            rate_per_hour,
            start_clock_time,
        })
    }
}

/// Adds `elapsed_hours` (truncated to whole milliseconds) to a same-day start
/// time. Returns `None` when the duration cannot be represented.
fn project_arrival(start: ClockTime, elapsed_hours: f64) -> Option<ArrivalTime> {
    let millis = (elapsed_hours * MILLIS_PER_HOUR).trunc();
    if !millis.is_finite() || millis >= i64::MAX as f64 {
        return None;
    }
    let delta = Duration::try_milliseconds(millis as i64)?;

    let (time, overflow_secs) = start.to_naive_time().overflowing_add_signed(delta);
    Some(ArrivalTime {
        time,
        day_offset: overflow_secs / SECONDS_PER_DAY,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn input(start_od: f64, target_od: f64, rate: f64, start: Option<ClockTime>) -> GrowthInput {
        GrowthInput {
            start_od,
            target_od,
            rate_per_hour: rate,
            start_clock_time: start,
        }
    }

    #[test]
    fn test_tenfold_growth_ecoli() {
        let result = GrowthTimeEstimator::default().estimate(&input(0.1, 1.0, 2.0, None));
        let expected = 10f64.ln() / 2.0;
        assert!((result.elapsed_hours() - expected).abs() < 1e-12);
        assert!((result.elapsed_hours() - 1.1513).abs() < 1e-4);
        assert_eq!(result.arrival_clock_time(), None);
    }

    #[test]
    fn test_arrival_from_nine() {
        let result = GrowthTimeEstimator::default()
            .estimate(&input(0.1, 1.0, 2.0, ClockTime::new(9, 0)));
        let arrival = result.arrival_clock_time().expect("arrival time");
        assert_eq!((arrival.time.hour(), arrival.time.minute()), (10, 9));
        assert_eq!(arrival.day_offset, 0);
    }

    #[test]
    fn test_arrival_rolls_past_midnight() {
        // e^5 growth at rate 1/h takes 5 h
        let target = 0.1 * 5f64.exp();
        let result = GrowthTimeEstimator::default()
            .estimate(&input(0.1, target, 1.0, ClockTime::new(23, 0)));
        let arrival = result.arrival_clock_time().expect("arrival time");
        let secs = i64::from(arrival.time.num_seconds_from_midnight());
        assert!((secs - 4 * 3600).abs() <= 1, "arrived at {}", arrival.time);
        assert_eq!(arrival.day_offset, 1);
    }

    #[test]
    fn test_invalid_parameters() {
        let estimator = GrowthTimeEstimator::default();
        for bad in [
            input(0.0, 1.0, 2.0, None),
            input(0.5, 0.5, 2.0, None),
            input(0.5, 0.2, 2.0, None),
            input(0.1, 1.0, 0.0, None),
            input(0.1, 1.0, -1.0, None),
            input(f64::NAN, 1.0, 1.0, None),
        ] {
            assert_eq!(
                estimator.estimate(&bad).error_kind(),
                Some(GrowthErrorKind::InvalidGrowthParameters)
            );
            assert_eq!(estimator.estimate(&bad).elapsed_hours(), 0.0);
        }
    }

    #[test]
    fn test_underflowing_rate_rejected() {
        // smallest subnormal: ln(10) / rate overflows to infinity
        let estimator = GrowthTimeEstimator::default();
        let result = estimator.estimate(&input(0.1, 1.0, f64::from_bits(1), None));
        assert_eq!(result.error_kind(), Some(GrowthErrorKind::InvalidGrowthParameters));
    }

    #[test]
    fn test_unrepresentable_arrival_rejected() {
        let estimator = GrowthTimeEstimator::default();
        let result = estimator.estimate(&input(0.1, 1.0, 1e-300, ClockTime::new(8, 0)));
        assert_eq!(result.error_kind(), Some(GrowthErrorKind::InvalidGrowthParameters));
    }

    #[test]
    fn test_far_arrival_anchors_without_panic() {
        // about 262,000 years out: still a clock time, but past chrono's last date
        let estimator = GrowthTimeEstimator::default();
        let result = estimator.estimate(&input(0.1, 1.0, 1e-9, ClockTime::new(8, 0)));
        let arrival = result.arrival_clock_time().expect("arrival should be projected");
        assert!(arrival.day_offset > 0);
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(arrival.on(start), None);
    }

    #[test]
    fn test_resolve_rate() {
        let table = SpeciesRateTable::default();
        assert_eq!(resolve_rate(&table, Species::SCerevisiae, Some("9")), Ok(0.4));
        assert_eq!(resolve_rate(&table, Species::Custom, Some("0.7")), Ok(0.7));
        assert_eq!(
            resolve_rate(&table, Species::Custom, None),
            Err(RateError::MissingCustomRate)
        );
        assert_eq!(
            resolve_rate(&table, Species::Custom, Some("fast")),
            Err(RateError::Unparseable("fast".to_string()))
        );
    }

    #[test]
    fn test_estimate_raw() {
        let estimator = GrowthTimeEstimator::default();

        let raw = RawGrowthInput {
            start_od: "0.1",
            target_od: "1.0",
            species: Species::EColi,
            custom_rate: None,
            start_time: Some("09:00"),
        };
        assert!(estimator.estimate_raw(&raw).arrival_clock_time().is_some());

        let blank_time = RawGrowthInput {
            start_time: Some(""),
            ..raw
        };
        assert!(estimator.estimate_raw(&blank_time).arrival_clock_time().is_none());

        let bad_time = RawGrowthInput {
            start_time: Some("9am"),
            ..raw
        };
        let result = estimator.estimate_raw(&bad_time);
        assert!(result.estimate().is_some());
        assert!(result.arrival_clock_time().is_none());

        let typing = RawGrowthInput {
            target_od: "",
            ..raw
        };
        assert_eq!(estimator.estimate_raw(&typing), GrowthResult::Incomplete);

        let custom_typing = RawGrowthInput {
            species: Species::Custom,
            custom_rate: Some("."),
            ..raw
        };
        assert_eq!(estimator.estimate_raw(&custom_typing), GrowthResult::Incomplete);

        let backwards = RawGrowthInput {
            start_od: "1.0",
            target_od: "0.1",
            ..raw
        };
        assert_eq!(
            estimator.estimate_raw(&backwards).error_kind(),
            Some(GrowthErrorKind::InvalidGrowthParameters)
        );
    }
}
