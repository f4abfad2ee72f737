//! A [`ProgramSource`] that loads a [`Program`] from a JSON file, used by
//! the `taintgraph` binary. Real embeddings adapt their own SSA builder
//! instead (see [`crate::features::ssa::ports::ProgramSource`]); this
//! adapter exists so the CLI has a concrete, host-independent input format,
//! mirroring the pass-through/taint-graph JSON round trips in
//! `taint_analysis::infrastructure::persistence`.

use std::fs;
use std::path::Path;

use crate::errors::Result;
use crate::features::ssa::domain::Program;
use crate::features::ssa::ports::ProgramSource;

pub struct JsonProgramSource {
    program: Program,
}

impl JsonProgramSource {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let program: Program = serde_json::from_str(&text)?;
        Ok(JsonProgramSource { program })
    }
}

impl ProgramSource for JsonProgramSource {
    fn build(self) -> Program {
        self.program
    }
}
