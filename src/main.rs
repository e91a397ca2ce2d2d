//! logcluster: clusters log error lines and prints each group with counts
//!
//! This is the main entrypoint that wires the error source, the k selection
//! strategy and standard output into the clustering pipeline.

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use logcluster::{Args, FixedK, InteractiveSelector, KSelector, LogClusterer};
use std::io;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    let env = Env::default().filter_or("RUST_LOG", default_level);
    env_logger::init_from_env(env);

    let clusterer = LogClusterer::new(args.config());
    let source = args.source();

    let mut selector: Box<dyn KSelector> = match args.k {
        Some(k) => Box::new(FixedK(k)),
        None => Box::new(InteractiveSelector::new(io::stdin().lock(), io::stdout())),
    };

    let mut out = io::stdout();
    clusterer.cluster_logs(source.as_ref(), selector.as_mut(), &mut out)?;

    Ok(())
}
