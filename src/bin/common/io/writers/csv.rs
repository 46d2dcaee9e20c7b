use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use log::debug;
use penman::models::output::Output;

use crate::common::{
    helpers::AppError,
    io::models::output::{OutputMetadata, OutputVariable},
};

use super::prelude::OutputSink;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One row per day, the date first and then the variables in the configured order
pub struct CsvWriter {
    path: PathBuf,
}

impl CsvWriter {
    pub fn new(path: &str) -> Self {
        Self {
            path: PathBuf::from(path),
        }
    }

    fn write_to<W: Write>(
        writer: &mut W,
        output: &Output,
        variables: &[OutputVariable],
    ) -> std::io::Result<()> {
        let names = variables.iter().map(|v| v.name()).collect::<Vec<_>>();
        writeln!(writer, "date,{}", names.join(","))?;

        let columns = variables
            .iter()
            .map(|v| v.get_values(output))
            .collect::<Vec<_>>();

        for (idx, date) in output.dates().iter().enumerate() {
            let values = columns
                .iter()
                .map(|column| column[idx].to_string())
                .collect::<Vec<_>>();
            writeln!(writer, "{},{}", date.format(DATE_FORMAT), values.join(","))?;
        }
        writer.flush()
    }
}

impl OutputSink for CsvWriter {
    fn write(
        &mut self,
        output: &Output,
        _metadata: &OutputMetadata,
        variables: &[OutputVariable],
    ) -> Result<(), AppError> {
        debug!("[CSV] Writing {} days to {:?}", output.len(), self.path);
        let file = File::create(&self.path)
            .map_err(|err| format!("Cannot create file {:?}: error {err}", self.path))?;
        let mut writer = BufWriter::new(file);
        Self::write_to(&mut writer, output, variables)
            .map_err(|err| format!("Cannot write file {:?}: error {err}", self.path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ndarray::Array1;
    use penman::{
        constants::NODATAVAL,
        models::output::{OutputElement, OutputVariableName},
    };

    #[test]
    fn rows_follow_the_variables() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 15).expect("valid date");
        let output = Output::new(Array1::from_vec(vec![
            OutputElement {
                evaporation: 8.303124287970107,
                temperature: 28.0,
                ..OutputElement::new(date)
            },
            OutputElement::new(date.succ_opt().expect("valid date")),
        ]));
        let variables = vec![
            OutputVariable::new(OutputVariableName::evaporation, "penman_evaporation", 3),
            OutputVariable::new(OutputVariableName::temperature, "temperature", 1),
        ];

        let mut buffer = Vec::new();
        CsvWriter::write_to(&mut buffer, &output, &variables).expect("should write");
        let text = String::from_utf8(buffer).expect("valid utf8");
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines[0], "date,penman_evaporation,temperature");
        assert_eq!(lines[1], "2025-07-15,8.303,28");
        assert_eq!(lines[2], format!("2025-07-16,{NODATAVAL},{NODATAVAL}"));
    }
}
