use clap::Parser;
use od600_calc::config::{Command, FormKind, OutputFormat};
use od600_calc::core::batch::run_batch_file;
use od600_calc::core::display::{DilutionReport, GrowthReport};
use od600_calc::core::form::{run_session, DilutionForm, GrowthForm};
use od600_calc::core::ConfigProvider;
use od600_calc::domain::model::OutcomeStatus;
use od600_calc::utils::{logger, validation::Validate};
use od600_calc::{
    CalcError, CliConfig, ClockTime, DilutionCalculator, GrowthTimeEstimator, RawGrowthInput,
    Result, Species, TomlConfig,
};
use serde::Serialize;

const EXIT_INVALID: i32 = 1;
const EXIT_INCOMPLETE: i32 = 2;
const EXIT_RUNTIME_ERROR: i32 = 3;

fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    match run(&cli, &config) {
        Ok(OutcomeStatus::Ok) => {}
        Ok(OutcomeStatus::Invalid) => std::process::exit(EXIT_INVALID),
        Ok(OutcomeStatus::Incomplete) => std::process::exit(EXIT_INCOMPLETE),
        Err(e) => fail(&e),
    }
}

fn fail(e: &CalcError) -> ! {
    tracing::error!("❌ {}", e);
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(EXIT_RUNTIME_ERROR);
}

fn load_config(cli: &CliConfig) -> Result<TomlConfig> {
    cli.validate()?;

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            TomlConfig::from_file(path)?
        }
        None => TomlConfig::default(),
    };
    config.validate()?;

    tracing::debug!("Effective configuration: {:?}", config);
    Ok(config)
}

fn run<C: ConfigProvider>(cli: &CliConfig, config: &C) -> Result<OutcomeStatus> {
    let display = config.display_settings();

    match &cli.command {
        Command::Dilute {
            culture_od,
            target_od,
            volume,
            unit,
        } => {
            let unit = unit.unwrap_or_else(|| config.default_volume_unit());
            let result = DilutionCalculator::new().compute_raw(
                culture_od.as_deref().unwrap_or_default(),
                target_od.as_deref().unwrap_or_default(),
                volume.as_deref().unwrap_or_default(),
                unit,
            );
            let report = DilutionReport::new(&result, &display);
            emit(cli.format, &report, || report.render_text())?;
            Ok(result.status())
        }

        Command::Grow {
            start_od,
            target_od,
            species,
            custom_rate,
            start_time,
        } => {
            let species = species.unwrap_or_else(|| config.default_species());
            let default_rate = format!("{:?}", config.default_custom_rate());
            let custom_rate = custom_rate.as_deref().unwrap_or(&default_rate);

            if let Some(time) = start_time.as_deref().filter(|t| !t.trim().is_empty()) {
                if let Err(e) = time.parse::<ClockTime>() {
                    tracing::warn!("Ignoring start time: {}", e);
                }
            }

            let estimator = GrowthTimeEstimator::new(config.rates());
            let result = estimator.estimate_raw(&RawGrowthInput {
                start_od: start_od.as_deref().unwrap_or_default(),
                target_od: target_od.as_deref().unwrap_or_default(),
                species,
                custom_rate: Some(custom_rate),
                start_time: start_time.as_deref(),
            });
            let report = GrowthReport::new(&result, &display);
            emit(cli.format, &report, || report.render_text())?;
            Ok(result.status())
        }

        Command::Species => {
            let rows = species_rows(config);
            emit(cli.format, &rows, || {
                rows.iter()
                    .map(|row| match row.rate_per_hour {
                        Some(rate) => format!("{:<14} {} /h", row.species, rate),
                        None => format!(
                            "{:<14} user supplied (default {} /h)",
                            row.species,
                            config.default_custom_rate()
                        ),
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
            Ok(OutcomeStatus::Ok)
        }

        Command::Batch { input, output } => {
            let summary =
                run_batch_file(input.as_str(), output.as_deref(), config.default_volume_unit())?;
            if let Some(output) = output {
                emit(cli.format, &summary, || {
                    format!(
                        "✅ Wrote {} rows to {} ({} ok, {} invalid, {} incomplete)",
                        summary.total, output, summary.ok, summary.invalid, summary.incomplete
                    )
                })?;
            }
            Ok(OutcomeStatus::Ok)
        }

        Command::Interactive { form } => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            match form {
                FormKind::Dilute => {
                    let mut form = DilutionForm::new(config.default_volume_unit());
                    run_session(&mut form, &display, stdin.lock(), stdout.lock())?;
                }
                FormKind::Grow => {
                    let mut form = GrowthForm::new(
                        config.rates(),
                        config.default_species(),
                        config.default_custom_rate(),
                    );
                    run_session(&mut form, &display, stdin.lock(), stdout.lock())?;
                }
            }
            Ok(OutcomeStatus::Ok)
        }
    }
}

#[derive(Serialize)]
struct SpeciesRow {
    species: String,
    rate_per_hour: Option<f64>,
}

fn species_rows<C: ConfigProvider>(config: &C) -> Vec<SpeciesRow> {
    Species::ALL
        .iter()
        .map(|&species| SpeciesRow {
            species: species.name().to_string(),
            rate_per_hour: config.rates().rate_for(species),
        })
        .collect()
}

fn emit<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce() -> String,
) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}
