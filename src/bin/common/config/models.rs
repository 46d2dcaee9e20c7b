use log::info;
use penman::{
    models::output::Output,
    modules::penman::{config::PenmanModelConfig, models::PenmanEvaporation},
};

use crate::common::{
    helpers::AppError,
    io::{
        models::output::{OutputFormat, OutputMetadata, OutputVariable},
        writers::{csv::CsvWriter, json::JsonWriter, prelude::OutputSink},
    },
};

use super::builder::{OutputConfig, PenmanConfigBuilder};

pub struct OutputWriter {
    sink: Box<dyn OutputSink>,
    variables: Vec<OutputVariable>,
    metadata: OutputMetadata,
}

impl OutputWriter {
    pub fn new(output_def: &OutputConfig, metadata: OutputMetadata) -> Self {
        let sink: Box<dyn OutputSink> = match output_def.format {
            OutputFormat::Csv => Box::new(CsvWriter::new(&output_def.path)),
            OutputFormat::Json => Box::new(JsonWriter::new(&output_def.path)),
        };
        Self {
            sink,
            variables: output_def.variables.clone(),
            metadata,
        }
    }

    pub fn write_output(&mut self, output: &Output) -> Result<(), AppError> {
        self.sink.write(output, &self.metadata, &self.variables)
    }
}

/// Everything needed to run the evaporation model on a station file
pub struct PenmanConfig {
    engine: PenmanEvaporation,
    model_config: PenmanModelConfig,
    datetime_format: String,
    station: String,
    output_def: OutputConfig,
}

impl PenmanConfig {
    pub fn new(config_defs: &PenmanConfigBuilder) -> Result<PenmanConfig, AppError> {
        if !(-90.0..=90.0).contains(&config_defs.latitude) {
            return Err(format!("Invalid latitude {}", config_defs.latitude).into());
        }
        let engine = PenmanEvaporation::new(
            config_defs.latitude,
            config_defs.elevation,
            config_defs.albedo,
        );
        let model_config =
            PenmanModelConfig::new(&config_defs.wind_function, config_defs.use_wind)?;

        let station = config_defs
            .station
            .clone()
            .unwrap_or_else(|| "station".into());

        info!(
            "Site {station}: latitude {}°, elevation {} m, albedo {}",
            config_defs.latitude, config_defs.elevation, config_defs.albedo
        );

        Ok(PenmanConfig {
            engine,
            model_config,
            datetime_format: config_defs.datetime_format.clone(),
            station,
            output_def: config_defs.output.clone(),
        })
    }

    pub fn engine(&self) -> &PenmanEvaporation {
        &self.engine
    }

    pub fn model_config(&self) -> &PenmanModelConfig {
        &self.model_config
    }

    pub fn datetime_format(&self) -> &str {
        &self.datetime_format
    }

    /// Run without wind, e.g. when the station file has no wind column
    pub fn disable_wind(&mut self) {
        self.model_config = PenmanModelConfig::without_wind();
    }

    /// Switch to another wind function; ignored when the model runs without wind
    pub fn set_wind_function(&mut self, name: &str) -> Result<(), AppError> {
        self.model_config = PenmanModelConfig::new(name, self.model_config.use_wind())?;
        Ok(())
    }

    pub fn set_output_path(&mut self, path: &str) {
        self.output_def.path = path.to_owned();
    }

    pub fn output_path(&self) -> &str {
        &self.output_def.path
    }

    pub fn metadata(&self) -> OutputMetadata {
        let props = self.engine.properties();
        OutputMetadata {
            station: self.station.clone(),
            latitude: props.latitude_rad.to_degrees(),
            elevation: props.elevation,
            albedo: props.albedo,
            wind_function: self
                .model_config
                .wind_function()
                .map(|wind_function| wind_function.to_string()),
        }
    }

    pub fn get_output_writer(&self) -> OutputWriter {
        OutputWriter::new(&self.output_def, self.metadata())
    }
}
