//! `taintgraph` — command-line entry point for one analysis run.
//!
//! Exposes every `RunConfig` field as a flag, loads the program to analyze
//! from a JSON file (the concrete input format this binary adapts; real
//! embeddings link `taintgraph_core` directly and implement `ProgramSource`
//! over their own SSA representation instead), runs the orchestrator, and
//! reports fatal errors with a non-zero exit code.
//!
//! ```text
//! taintgraph --program prog.json --pkg-path app/... --module-name example.com/app \
//!     --taint-graph-dst graph.json --pass-through-dst summaries.json
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use taintgraph_core::config::RunConfig;
use taintgraph_core::features::ssa::infrastructure::JsonProgramSource;
use taintgraph_core::features::taint_analysis::infrastructure::DefaultRuleOracle;
use taintgraph_core::pipeline::Runner;

#[derive(Parser)]
#[command(name = "taintgraph")]
#[command(about = "Interprocedural taint analysis over a JSON-serialized SSA program", long_about = None)]
struct Cli {
    /// Path to the JSON-serialized program to analyze.
    #[arg(long)]
    program: String,

    /// Go-style module name (e.g. `example.com/app`), used to scope the
    /// default rule oracle's intra-module classification.
    #[arg(long, default_value = "")]
    module_name: String,

    /// Package import paths under analysis; repeat for multiple packages.
    #[arg(long = "pkg-path")]
    pkg_paths: Vec<String>,

    /// Resolve dynamic dispatch through an auxiliary call graph instead of
    /// the interface hierarchy alone; requires a `main.main` in the program.
    #[arg(long)]
    use_pointer_analysis: bool,

    /// Raise the default log filter from `info` to `debug`.
    #[arg(long)]
    debug: bool,

    /// Analyze only `init` functions and stop.
    #[arg(long)]
    init_only: bool,

    /// Compute pass-through summaries only; skip taint-graph edge recording.
    #[arg(long)]
    pass_through_only: bool,

    /// Precomputed summary catalogs to preload before the run; repeatable.
    #[arg(long = "pass-through-src")]
    pass_through_src_paths: Vec<String>,

    /// Where to write the computed summary catalog as JSON.
    #[arg(long)]
    pass_through_dst: Option<String>,

    /// Where to write the taint graph's edge list as JSON.
    #[arg(long)]
    taint_graph_dst: Option<String>,

    /// Analyze a single function by canonical name, skipping all others.
    #[arg(long)]
    target_func: Option<String>,

    /// Enable backward pointer-taint propagation through output parameters.
    #[arg(long)]
    pass_back: bool,

    /// Push the taint graph to Neo4j after the run. Accepted for parity with
    /// the configuration surface; this core never acts on it (see
    /// `RunConfig::warn_if_neo4j_requested`).
    #[arg(long)]
    persist_to_neo4j: bool,

    #[arg(long)]
    neo4j_uri: Option<String>,

    #[arg(long)]
    neo4j_username: Option<String>,

    #[arg(long)]
    neo4j_password: Option<String>,
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        RunConfig {
            module_name: cli.module_name,
            pkg_paths: cli.pkg_paths,
            use_pointer_analysis: cli.use_pointer_analysis,
            debug: cli.debug,
            init_only: cli.init_only,
            pass_through_only: cli.pass_through_only,
            pass_through_src_paths: cli.pass_through_src_paths,
            pass_through_dst_path: cli.pass_through_dst,
            taint_graph_dst_path: cli.taint_graph_dst,
            persist_to_neo4j: cli.persist_to_neo4j,
            neo4j_uri: cli.neo4j_uri,
            neo4j_username: cli.neo4j_username,
            neo4j_password: cli.neo4j_password,
            target_func: cli.target_func,
            pass_back: cli.pass_back,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let program_path = cli.program.clone();
    let config = RunConfig::from(cli);

    let source = match JsonProgramSource::load(&program_path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("taintgraph: failed to load {program_path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let rule_oracle = Box::new(DefaultRuleOracle::new(config.pkg_paths.clone()));
    let runner = Runner::new(config).with_rule_oracle(rule_oracle);

    match runner.run(source) {
        Ok(output) => {
            println!(
                "taintgraph: analyzed {} function(s), recorded {} taint-graph edge(s)",
                output.summaries.len(),
                output.taint_graph.edges.len()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("taintgraph: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Defaults to `info`; `--debug` raises it to `debug`. Respects `RUST_LOG`
/// when set, per `tracing-subscriber`'s usual precedence.
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
