use std::{
    io::{self, BufWriter, Write},
    process,
};

use anyhow::{Context, Result};
use clap::Parser;
use kavl::prelude::*;
use tracing::debug;

/// kavl: run a query string against a k-AVL tree
#[derive(Debug, Parser)]
#[command(
    name = "kavl",
    about = "Run insert/delete/search queries against a k-AVL tree",
    version
)]
struct Args {
    /// Queries, e.g. "1, insert 5 0, search 5 0, in_order". The first token is k.
    #[arg(env = "KAVL_QUERY")]
    query: String,

    /// Separator between tokens of the query string
    #[arg(short, long, env = "KAVL_DELIMITER", default_value = DEFAULT_DELIMITER)]
    delimiter: String,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("kavl: error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    debug!(?args, "starting");

    let reports = kavl::query::run(&args.query, &args.delimiter)
        .with_context(|| format!("could not run query `{}`", args.query))?;

    let mut stdout = BufWriter::new(io::stdout().lock());
    for report in &reports {
        writeln!(stdout, "{report}").context("could not write to stdout")?;
    }
    stdout.flush().context("could not write to stdout")?;

    Ok(())
}
