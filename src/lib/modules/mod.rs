pub mod aggregation;
pub mod functions;
pub mod penman;
