//! JSON persistence for summaries and the taint graph, grounded on the
//! reference `FetchPassThrough`/`PersistPassThrough`/`PersistTaintGraph`
//! (runner.go): a flat `canonical -> PassThroughCache` map for summaries, a
//! flat edge list for the taint graph.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;

use crate::errors::Result;
use crate::features::taint_analysis::domain::{Edge, PassThroughCache};

/// Loads every summary file in `paths` and merges them into `into`, so
/// functions already summarized on disk are not re-analyzed this run.
/// Entries from later paths overwrite earlier ones on key collision.
pub fn load_pass_through(into: &mut FxHashMap<String, PassThroughCache>, paths: &[String]) -> Result<()> {
    for path in paths {
        let text = fs::read_to_string(path)?;
        let loaded: FxHashMap<String, PassThroughCache> = serde_json::from_str(&text)?;
        into.extend(loaded);
    }
    Ok(())
}

pub fn persist_pass_through(container: &FxHashMap<String, PassThroughCache>, path: &str) -> Result<()> {
    let text = serde_json::to_string_pretty(container)?;
    write_parent_dirs(path)?;
    fs::write(path, text)?;
    Ok(())
}

pub fn persist_taint_graph(edges: &[Edge], path: &str) -> Result<()> {
    let text = serde_json::to_string_pretty(edges)?;
    write_parent_dirs(path)?;
    fs::write(path, text)?;
    Ok(())
}

fn write_parent_dirs(path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
