mod common;
use std::env::{set_var, var};
use std::error::Error;
use std::path::Path;

use chrono::prelude::*;
use clap::Parser;

use common::config::builder::PenmanConfigBuilder;
use common::config::models::PenmanConfig;
use common::helpers::AppError;
use common::io::readers::prelude::InputHandler;
use common::io::readers::text::TextInputHandler;
use log::{info, trace, warn};
use penman::models::input::ObservationVariableName;
use penman::modules::aggregation::aggregate_daily;
use penman::version::LONG_VERSION;

#[derive(Parser, Debug)]
#[command(
    version,
    long_version=LONG_VERSION,
    about="Daily potential evaporation from routine weather station data",
    long_about="Computes the daily potential evaporation of a site with the simplified Penman equation of Valiantzas (2006).
Sub-daily station observations are aggregated to calendar days, then evaporation is computed for every complete day."
)]
struct Args {
    #[arg(required = true, help = "Path to the configuration file", index = 1)]
    config_path: String,

    #[arg(required = true, help = "Path to the station observations file", index = 2)]
    input_path: String,

    #[arg(short, long, help = "Output file, overrides the configured path")]
    output: Option<String>,

    #[arg(
        short,
        long,
        help = "Wind function: penman1948, penman1956 or linacre1993"
    )]
    wind_function: Option<String>,

    #[arg(long, help = "Use the equation without wind even if wind data is available")]
    no_wind: bool,
}

fn run_penman(config: &PenmanConfig, handler: &dyn InputHandler) -> Result<(), AppError> {
    let mut output_writer = config.get_output_writer();

    let c = Utc::now();
    let days = aggregate_daily(handler.get_observations(), config.model_config().use_wind());
    trace!("Aggregating observations took {} seconds", Utc::now() - c);

    if days.is_empty() {
        return Err("No days to process".into());
    }
    info!(
        "Processing {} days, {} to {}",
        days.len(),
        days[0].date,
        days[days.len() - 1].date
    );

    let c = Utc::now();
    let (output, failures) = config.engine().get_output(&days, config.model_config());
    trace!("Computing evaporation took {} seconds", Utc::now() - c);

    for (date, err) in &failures {
        warn!("Evaporation not computed for {}: {}", date, err);
    }

    let summary = output.summary();
    info!("{} of {} days computed", summary.valid_days, summary.days);
    if let (Some(mean), Some(max)) = (summary.mean, summary.max) {
        info!("Evaporation mean {:.2} mm/day, max {:.2} mm/day", mean, max);
    }

    let c = Utc::now();
    output_writer.write_output(&output)?;
    trace!("Writing output took {} seconds", Utc::now() - c);
    info!("Output written to {}", config.output_path());
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config_path_str = args.config_path;
    let input_path_str = args.input_path;

    if var("RUST_LOG").is_err() {
        set_var("RUST_LOG", "info")
    }
    pretty_env_logger::init();

    if !Path::new(&config_path_str).is_file() {
        return Err(format!("Config file {} is not a file", config_path_str).into());
    }

    let config_defs = PenmanConfigBuilder::from_file(&config_path_str)
        .map_err(|err| format!("Failed to load config: {}", err))?;

    let mut config = config_defs
        .build()
        .map_err(|err| format!("Could not configure model: {}", err))?;

    if args.no_wind {
        config.disable_wind();
    }
    if let Some(wind_function) = &args.wind_function {
        config.set_wind_function(wind_function)?;
    }
    if let Some(output) = &args.output {
        config.set_output_path(output);
    }

    let start_time = Utc::now();
    let input_handler = TextInputHandler::new(&input_path_str, config.datetime_format())?;
    info!("Input file:\n{}", input_handler.info_input());
    trace!("Reading input took {} seconds", Utc::now() - start_time);

    if config.model_config().use_wind()
        && !input_handler.has_variable(ObservationVariableName::WindSpeed)
    {
        warn!("No wind speed in input, using the equation without wind");
        config.disable_wind();
    }

    match config.model_config().wind_function() {
        Some(wind_function) => info!("Running with wind function {}", wind_function),
        None => info!("Running without wind"),
    }

    run_penman(&config, &input_handler)?;
    info!("Run took {} seconds", Utc::now() - start_time);
    Ok(())
}
