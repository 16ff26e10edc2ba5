//! Football feature CLI
//!
//! Adds season points, rolling form and home/away rates to a results file.

use clap::{Parser, Subcommand};
use footy::data::OutputFormat;
use footy::{Config, Result, Strategy};

#[derive(Parser)]
#[command(name = "footy")]
#[command(about = "Leakage-free match features for football results", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "footy.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute features for every match in a results file
    Features {
        /// Input CSV file
        input: String,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Extra input columns to copy through (comma separated)
        #[arg(long, value_delimiter = ',')]
        keep: Vec<String>,
        /// Output format
        #[arg(long, default_value = "csv")]
        format: OutputFormat,
        /// Override the configured strategy (incremental or scan)
        #[arg(long)]
        strategy: Option<Strategy>,
        /// Count same-day matches in cumulative points (legacy output)
        #[arg(long)]
        inclusive_cutoff: bool,
        /// Skip rolling form columns
        #[arg(long)]
        no_form: bool,
        /// Skip home/away rate columns
        #[arg(long)]
        no_rates: bool,
        /// Add days since the season started
        #[arg(long)]
        days_since_start: bool,
        /// Date format of the input file
        #[arg(long)]
        date_format: Option<String>,
        /// Marker written for undefined values in CSV output
        #[arg(long)]
        missing: Option<String>,
    },
    /// Show a summary of a results file
    Inspect {
        /// Input CSV file
        input: String,
    },
    /// Write a default config file
    Init,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Features {
            input,
            output,
            keep,
            format,
            strategy,
            inclusive_cutoff,
            no_form,
            no_rates,
            days_since_start,
            date_format,
            missing,
        } => {
            let mut config = config;
            for column in keep {
                if !config.data.keep.contains(&column) {
                    config.data.keep.push(column);
                }
            }
            if let Some(strategy) = strategy {
                config.features.strategy = strategy;
            }
            if inclusive_cutoff {
                config.features.cumulative_cutoff = footy::CutoffPolicy::Inclusive;
            }
            if no_form {
                config.features.form = false;
            }
            if no_rates {
                config.features.rates = false;
            }
            if days_since_start {
                config.features.days_since_start = true;
            }
            if let Some(date_format) = date_format {
                config.data.date_format = date_format;
            }
            if let Some(missing) = missing {
                config.data.missing_marker = missing;
            }
            commands::features(&config, &input, output.as_deref(), format)
        }
        Commands::Inspect { input } => commands::inspect(&config, &input),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use footy::data::{export, CsvLoader};
    use footy::FeatureEngine;
    use std::fs::File;
    use std::io::{self, BufWriter, Write};

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        println!("\nNext steps:");
        println!("  1. Edit {} to add seasons or change the form window", config_path);
        println!("  2. Run 'footy inspect results.csv' to check the input");
        println!("  3. Run 'footy features results.csv -o features.csv'");

        Ok(())
    }

    pub fn features(
        config: &Config,
        input: &str,
        output: Option<&str>,
        format: OutputFormat,
    ) -> Result<()> {
        let engine = FeatureEngine::from_config(config)?;
        let dataset = CsvLoader::from_config(&config.data).load(input)?;

        if dataset.is_empty() {
            log::warn!("No matches found in {}", input);
        }

        let features = engine.compute(&dataset);
        let columns = engine.columns();

        let writer: Box<dyn Write> = match output {
            Some(path) => Box::new(BufWriter::new(File::create(path)?)),
            None => Box::new(BufWriter::new(io::stdout().lock())),
        };

        match format {
            OutputFormat::Csv => export::write_csv(
                writer,
                &dataset,
                &features,
                &columns,
                &config.data.missing_marker,
            )?,
            OutputFormat::Json => export::write_json(writer, &dataset, &features, &columns)?,
        }

        if let Some(path) = output {
            log::info!("Wrote {} rows to {}", features.len(), path);
        }

        Ok(())
    }

    pub fn inspect(config: &Config, input: &str) -> Result<()> {
        let dataset = CsvLoader::from_config(&config.data).load(input)?;
        let stats = dataset.stats();

        println!("Dataset Summary");
        println!("───────────────────────────────");
        println!("  Path:       {}", input);
        println!("  Matches:    {}", stats.match_count);
        println!("  Teams:      {}", stats.team_count);
        println!("  Seasons:    {}", stats.seasons.join(", "));
        println!("  Divisions:  {}", stats.divisions.join(", "));
        if let (Some(earliest), Some(latest)) = (stats.earliest_match, stats.latest_match) {
            println!("  Range:      {} to {}", earliest, latest);
        }

        Ok(())
    }
}
