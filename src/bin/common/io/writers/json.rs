use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use log::debug;
use penman::{constants::NODATAVAL, models::output::Output};
use serde_json::{json, Map, Value};

use crate::common::{
    helpers::AppError,
    io::models::output::{OutputMetadata, OutputVariable},
};

use super::{csv::DATE_FORMAT, prelude::OutputSink};

/// A single JSON document with the metadata, the summary and the daily rows.
/// No-data values are written as null.
pub struct JsonWriter {
    path: PathBuf,
}

impl JsonWriter {
    pub fn new(path: &str) -> Self {
        Self {
            path: PathBuf::from(path),
        }
    }

    // the flush reports the errors a dropped BufWriter would swallow
    fn write_to<W: Write>(writer: &mut W, value: &Value) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, value)?;
        writer.flush()
    }

    pub fn to_value(
        output: &Output,
        metadata: &OutputMetadata,
        variables: &[OutputVariable],
    ) -> Value {
        let columns = variables
            .iter()
            .map(|v| (v.name(), v.get_values(output)))
            .collect::<Vec<_>>();

        let rows = output
            .dates()
            .iter()
            .enumerate()
            .map(|(idx, date)| {
                let mut row = Map::new();
                row.insert("date".into(), json!(date.format(DATE_FORMAT).to_string()));
                for (name, values) in &columns {
                    let value = values[idx];
                    let value = if value == NODATAVAL { Value::Null } else { json!(value) };
                    row.insert(name.to_string(), value);
                }
                Value::Object(row)
            })
            .collect::<Vec<_>>();

        let variables = variables
            .iter()
            .map(|v| json!({"name": v.name(), "long_name": v.long_name(), "units": v.units()}))
            .collect::<Vec<_>>();

        json!({
            "metadata": metadata,
            "summary": output.summary(),
            "variables": variables,
            "data": rows,
        })
    }
}

impl OutputSink for JsonWriter {
    fn write(
        &mut self,
        output: &Output,
        metadata: &OutputMetadata,
        variables: &[OutputVariable],
    ) -> Result<(), AppError> {
        debug!("[JSON] Writing {} days to {:?}", output.len(), self.path);
        let file = File::create(&self.path)
            .map_err(|err| format!("Cannot create file {:?}: error {err}", self.path))?;
        let value = Self::to_value(output, metadata, variables);
        let mut writer = BufWriter::new(file);
        Self::write_to(&mut writer, &value)
            .map_err(|err| format!("Cannot write file {:?}: error {err}", self.path))?;
        Ok(())
    }
}
