//! Anytime heuristic solver: reads a PACE `.gr` graph on stdin, improves a
//! decomposition until SIGTERM/SIGINT or the timeout, then writes the best
//! `.td` found on stdout.

use std::io;
use std::time::Duration;

use clap::Parser;
use signal_hook::consts::{SIGINT, SIGTERM};

use treedec::core::cancel::CancelFlag;
use treedec::core::io::{read_graph, write_decomposition};
use treedec::pipeline::{self, Config};

#[derive(Debug, Parser)]
#[command(
    name = "treedec-heuristic",
    about = "Anytime heuristic tree decompositions of PACE .gr graphs"
)]
struct Args {
    /// Random seed driving the stochastic phases.
    #[arg(short = 's', long = "seed", default_value_t = 42)]
    seed: u64,
    /// Wall-clock limit in seconds.
    #[arg(long)]
    timeout: Option<u64>,
    /// Fork splitter subtasks onto a thread pool.
    #[arg(long)]
    parallel: bool,
    /// Emit the first complete solution instead of improving until shutdown.
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
    let cancel = CancelFlag::new();
    for signal in [SIGTERM, SIGINT] {
        if let Err(error) = signal_hook::flag::register(signal, cancel.as_arc()) {
            eprintln!("c could not register signal handler: {}", error);
        }
    }
    let graph = match read_graph(io::stdin().lock()) {
        Ok(graph) => graph,
        Err(_) => {
            println!("c Could not read the graph file.");
            std::process::exit(1);
        }
    };
    match pipeline::heuristic(&graph, &config, &cancel) {
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
