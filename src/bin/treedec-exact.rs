//! Exact treewidth solver: reads a PACE `.gr` graph on stdin and writes an
//! optimal `.td` decomposition on stdout.

use std::io;
use std::time::Duration;

use clap::Parser;

use treedec::core::cancel::CancelFlag;
use treedec::core::io::{read_graph, write_decomposition};
use treedec::pipeline::{self, Config};

#[derive(Debug, Parser)]
#[command(name = "treedec-exact", about = "Exact tree decompositions of PACE .gr graphs")]
struct Args {
    /// Random seed for the heuristic bounds.
    #[arg(short = 's', long = "seed", default_value_t = 42)]
    seed: u64,
    /// Wall-clock limit in seconds; the best known decomposition is emitted
    /// when it elapses.
    #[arg(long)]
    timeout: Option<u64>,
    /// Fork splitter subtasks onto a thread pool.
    #[arg(long)]
    parallel: bool,
    /// Emit the first complete solution.
    #[arg(long)]
    instant: bool,
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(tracing::Level::WARN)
        .try_init();
    let args = Args::parse();
    let config = Config {
        seed: args.seed,
        timeout: args.timeout.map(Duration::from_secs),
        parallel: args.parallel,
        instant: args.instant,
    };
    let graph = match read_graph(io::stdin().lock()) {
        Ok(graph) => graph,
        Err(_) => {
            println!("c Could not read the graph file.");
            std::process::exit(1);
        }
    };
    let cancel = CancelFlag::new();
    match pipeline::exact(&graph, &config, &cancel) {
        Ok(td) => {
            if let Err(error) = write_decomposition(io::stdout().lock(), &td) {
                println!("c {}", error);
                std::process::exit(1);
            }
        }
        Err(error) => {
            println!("c {}", error);
            std::process::exit(1);
        }
    }
}
