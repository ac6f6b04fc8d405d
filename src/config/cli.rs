use crate::domain::model::{Species, VolumeUnit};
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "od600-calc", version)]
#[command(about = "Dilution volumes and growth times for bacterial cultures from OD600 readings")]
pub struct CliConfig {
    /// TOML file overriding species rates, display precision and defaults
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormKind {
    Dilute,
    Grow,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Volumes of culture and media needed to reach a target OD
    Dilute {
        /// OD600 of the dense culture
        #[arg(long, allow_hyphen_values = true)]
        culture_od: Option<String>,

        /// OD600 wanted after dilution
        #[arg(long, allow_hyphen_values = true)]
        target_od: Option<String>,

        /// Final volume of the diluted culture
        #[arg(long, allow_hyphen_values = true)]
        volume: Option<String>,

        /// Unit of --volume (mL or L); defaults to the configured unit
        #[arg(long)]
        unit: Option<VolumeUnit>,
    },

    /// Time for a culture to grow from one OD to another
    Grow {
        #[arg(long, allow_hyphen_values = true)]
        start_od: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        target_od: Option<String>,

        /// Organism whose tabulated rate is used, or Custom
        #[arg(long)]
        species: Option<Species>,

        /// Growth rate per hour, used when --species is Custom
        #[arg(long, allow_hyphen_values = true)]
        custom_rate: Option<String>,

        /// Clock time the culture starts growing (HH:MM)
        #[arg(long)]
        start_time: Option<String>,
    },

    /// List the growth-rate table in effect
    Species,

    /// Dilute every row of a CSV file
    Batch {
        /// CSV with columns label,culture_od,target_od,final_volume,unit
        #[arg(long)]
        input: String,

        /// Where to write results; stdout when omitted
        #[arg(long)]
        output: Option<String>,
    },

    /// Edit a form line by line and see the result after every change
    Interactive {
        #[arg(value_enum, default_value_t = FormKind::Dilute)]
        form: FormKind,
    },
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config {
            validate_path("config", path)?;
        }

        if let Command::Batch { input, output } = &self.command {
            validate_path("batch.input", input)?;
            if let Some(output) = output {
                validate_path("batch.output", output)?;
            }
        }

        Ok(())
    }
}
