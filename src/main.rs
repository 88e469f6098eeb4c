//! Ratiograph - ratio graph quantity calculator
//!
//! Adds chain expressions to a graph, propagates a root quantity through it,
//! and prints every node's quantity.
//!
//! # Usage
//!
//! ```bash
//! ratiograph --config gene_graph_config.txt --root-quantity 10 2a.3b b.c,d
//! RUST_LOG=debug ratiograph --import chains.txt
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::info;
use ratiograph_core::{error::Result, quantity::format_quantity, Session};

/// Ratio graph quantity calculator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Chain expressions to add, e.g. `2a.3b` or `a.b,c`
    #[arg(value_name = "CHAIN")]
    chains: Vec<String>,

    /// Config file to load first (when it exists) and save back afterwards
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// File with one chain expression per line
    #[arg(short, long, value_name = "FILE")]
    import: Option<PathBuf>,

    /// Quantity given to every root node (e.g. 10, 3/2, 2.5)
    #[arg(short, long, value_name = "QUANTITY")]
    root_quantity: Option<String>,

    /// Start from an empty graph even if the config file exists
    #[arg(long)]
    clear: bool,

    /// Do not write the config file back
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut session = Session::new();

    // Load the existing graph
    if let Some(path) = &args.config {
        if path.exists() && !args.clear {
            session.load(path)?;
        } else {
            info!("starting from an empty graph");
        }
    }

    if let Some(text) = &args.root_quantity {
        session.set_root_quantity_text(text)?;
    }

    // Bulk import keeps going past bad lines
    if let Some(path) = &args.import {
        let report = session.import_file(path)?;
        for failure in &report.failures {
            eprintln!("{}:{}: {}", path.display(), failure.line, failure.message);
        }
        println!("imported {} chains from {}", report.applied, path.display());
    }

    for chain in &args.chains {
        session.apply_chain_text(chain)?;
    }

    let quantities = session.compute_quantities();

    println!("{}", session.summary());
    println!("edges:");
    for edge in session.export_edge_list() {
        println!("  {}", edge);
    }
    println!("quantities (root = {}):", format_quantity(session.root_quantity()));
    for name in session.node_names() {
        match quantities.get(&name) {
            Some(value) => println!("  {} = {}", name, format_quantity(value)),
            None => println!("  {} = -", name),
        }
    }

    if let Some(path) = &args.config {
        if !args.dry_run {
            session.save(path)?;
        }
    }

    Ok(())
}
