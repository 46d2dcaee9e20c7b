use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufRead},
    path::Path,
    str::FromStr,
};

use chrono::NaiveDateTime;
use libflate::gzip;
use log::{debug, warn};
use penman::models::input::{Observation, ObservationVariableName};
use strum::IntoEnumIterator;

use crate::common::helpers::AppError;

use super::prelude::InputHandler;

pub const DATETIME_COLUMN: &str = "datetime";
pub const SEPARATOR: char = ',';
pub const DEFAULT_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";

const REQUIRED_VARIABLES: [ObservationVariableName; 3] = [
    ObservationVariableName::Temperature,
    ObservationVariableName::GlobalRadiation,
    ObservationVariableName::RelativeHumidity,
];

fn open_file(path: &Path) -> Result<Box<dyn BufRead>, AppError> {
    let file = File::open(path)
        .map_err(|err| format!("Cannot open input file {}: {err}", path.display()))?;
    let reader = io::BufReader::new(file);

    if path.extension().is_some_and(|ext| ext == "gz") {
        let decoder = gzip::Decoder::new(reader)
            .map_err(|err| format!("Cannot decompress input file {}: {err}", path.display()))?;
        Ok(Box::new(io::BufReader::new(decoder)))
    } else {
        Ok(Box::new(reader))
    }
}

// quotes around a cell are dropped, a separator inside quotes is not supported
fn split_cells(line: &str) -> Result<Vec<&str>, String> {
    let cells = line.split(SEPARATOR).map(str::trim).collect::<Vec<_>>();
    let unbalanced = cells
        .iter()
        .any(|cell| cell.matches('"').count() % 2 != 0);
    if unbalanced {
        return Err(format!("quoted cell with a '{SEPARATOR}' inside is not supported"));
    }
    Ok(cells.into_iter().map(|cell| cell.trim_matches('"')).collect())
}

/// Position of each known column in the header
#[derive(Debug)]
struct Header {
    datetime: usize,
    columns: HashMap<ObservationVariableName, usize>,
}

fn parse_header(line: &str) -> Result<Header, AppError> {
    let line = line.trim_start_matches('\u{feff}');
    let mut datetime = None;
    let mut columns = HashMap::new();

    for (idx, cell) in split_cells(line)?.into_iter().enumerate() {
        if cell.eq_ignore_ascii_case(DATETIME_COLUMN) {
            datetime = Some(idx);
        } else if let Ok(var) = ObservationVariableName::from_str(cell) {
            columns.insert(var, idx);
        } else {
            debug!("Ignoring column {}", cell);
        }
    }

    let datetime = datetime.ok_or(format!("Column {DATETIME_COLUMN} not found in header"))?;
    for var in REQUIRED_VARIABLES {
        if !columns.contains_key(&var) {
            return Err(format!("Column {var} not found in header").into());
        }
    }
    Ok(Header { datetime, columns })
}

// empty cells are missing values
fn parse_value(cell: &str) -> Result<f64, String> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>()
        .map_err(|_| format!("invalid number '{cell}'"))
}

fn parse_line(line: &str, header: &Header, datetime_format: &str) -> Result<Observation, String> {
    let cells = split_cells(line)?;
    let time_cell = cells
        .get(header.datetime)
        .ok_or("missing datetime".to_string())?;
    let time = NaiveDateTime::parse_from_str(time_cell, datetime_format)
        .map_err(|_| format!("invalid datetime '{time_cell}', expected format {datetime_format}"))?;

    let mut observation = Observation::empty(time);
    for (var, idx) in &header.columns {
        let value = match cells.get(*idx) {
            Some(cell) => parse_value(cell)?,
            None => f64::NAN,
        };
        *observation.value_mut(*var) = value;
    }
    Ok(observation)
}

/// Reads a comma separated file of station observations, optionally gzipped.
/// The header names the columns, in any order.
/// Cells may be quoted, but a quoted cell must not contain the separator:
/// such lines are rejected instead of being split in the wrong place.
pub struct TextInputHandler {
    path: String,
    header: Header,
    observations: Vec<Observation>,
}

impl TextInputHandler {
    pub fn new(path: &str, datetime_format: &str) -> Result<Self, AppError> {
        let reader = open_file(Path::new(path))?;
        let mut lines = reader.lines().enumerate();

        let header = match lines.next() {
            Some((_, line)) => {
                let line = line.map_err(|err| format!("Cannot read header of {path}: {err}"))?;
                parse_header(&line)?
            }
            None => return Err(format!("Input file {path} is empty").into()),
        };

        let mut observations = Vec::new();
        for (i, line) in lines {
            let line = line.map_err(|err| format!("error reading {path} at line {}: {err}", i + 1))?;
            if line.trim().is_empty() {
                continue;
            }
            let observation = parse_line(&line, &header, datetime_format)
                .map_err(|err| format!("error parsing {path} at line {}: {err}", i + 1))?;
            observations.push(observation);
        }

        if observations.is_empty() {
            warn!("No observations found in {}", path);
        }

        Ok(Self {
            path: path.to_string(),
            header,
            observations,
        })
    }
}

impl InputHandler for TextInputHandler {
    fn get_observations(&self) -> &[Observation] {
        &self.observations
    }

    fn has_variable(&self, var: ObservationVariableName) -> bool {
        self.header.columns.contains_key(&var)
    }

    fn info_input(&self) -> String {
        let variables = ObservationVariableName::iter()
            .filter(|var| self.has_variable(*var))
            .map(|var| var.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let period = match (self.observations.first(), self.observations.last()) {
            (Some(first), Some(last)) => format!("{} - {}", first.time, last.time),
            _ => "-".to_string(),
        };
        format!(
            "{}: {} observations [{}]\nvariables: {}",
            self.path,
            self.observations.len(),
            period,
            variables
        )
    }
}
