mod fixture;
mod json_source;
mod unit_graph;

pub use fixture::{program_of, FunctionBuilder};
pub use json_source::JsonProgramSource;
pub use unit_graph::UnitGraph;
