use penman::models::output::Output;

use crate::common::{
    helpers::AppError,
    io::models::output::{OutputMetadata, OutputVariable},
};

/// Trait implemented by concrete output sinks (e.g. CSV, JSON) that persist the daily series.
pub trait OutputSink {
    fn write(
        &mut self,
        output: &Output,
        metadata: &OutputMetadata,
        variables: &[OutputVariable],
    ) -> Result<(), AppError>;
}
