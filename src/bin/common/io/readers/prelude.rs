use penman::models::input::{Observation, ObservationVariableName};

/// Trait defining the behavior of a source of station observations
pub trait InputHandler {
    /// all the observations, in file order
    fn get_observations(&self) -> &[Observation];

    /// true if the source provides the variable
    fn has_variable(&self, var: ObservationVariableName) -> bool;

    /// Returns a description of the loaded input
    fn info_input(&self) -> String;
}
