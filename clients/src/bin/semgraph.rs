//! `semgraph` — Loads ontology documents over the base vocabulary and inspects
//! the resulting graph.
//!
//! **Commands:**
//! - `stats` — node and triple counts
//! - `local-name <IRI>` — the short display name of a node
//! - `type <IRI> [--kind object|interface|edge|connection]` — the resolved
//!   output type, as JSON
//! - `dump [--out <path>]` — the forward index as N-Triples
//!
//! **Usage:**
//! ```
//! semgraph [--input <file>]... [--config <file.json>] [-v] <command>
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use semantic_graph::serializer::ntriples;
use semantic_graph::{GraphConfig, ParseOptions, RdfFormat, ResolverBundle, SemanticGraph};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Inspect a semantic graph built from ontology documents.
#[derive(Parser)]
#[command(name = "semgraph", about = "Inspect a semantic graph built from ontology documents")]
struct Args {
    /// Turtle (`.ttl`) or N-Triples (`.nt`) documents to load, in order.
    #[arg(long = "input", short = 'i')]
    inputs: Vec<PathBuf>,

    /// JSON graph configuration (`{"prefixes": {...}}`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base IRI for relative references in Turtle inputs.
    #[arg(long)]
    base: Option<String>,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(long, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print node and triple counts.
    Stats,
    /// Print the local name of a node.
    LocalName {
        /// Node IRI or `prefix:local` name.
        iri: String,
    },
    /// Print the resolved output type of a class as JSON.
    Type {
        /// Class IRI or `prefix:local` name.
        iri: String,
        /// Which output type to resolve.
        #[arg(long, value_enum, default_value_t = Kind::Object)]
        kind: Kind,
    },
    /// Write the forward index as N-Triples.
    Dump {
        /// Output file (default: stdout).
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Object,
    Interface,
    Edge,
    Connection,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let value: Value = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse config {}", path.display()))?;
            GraphConfig::from_json(&value)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => GraphConfig::default(),
    };

    let mut graph =
        SemanticGraph::new(resolvers(), config).context("Failed to construct the graph")?;

    for path in &args.inputs {
        let mut options = ParseOptions::new(RdfFormat::from_path(path));
        if let Some(base) = &args.base {
            options = options.with_base_iri(base.clone());
        }
        let report = graph
            .parse_file(path, &options)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        info!(
            path = %path.display(),
            decoded = report.decoded,
            indexed = report.indexed,
            "loaded document"
        );
    }

    match args.command {
        Command::Stats => {
            println!(
                "{graph}: {} nodes, {} triples, {} prefixes",
                graph.len(),
                graph.triple_count(),
                graph.prefixes().iter().count()
            );
        }
        Command::LocalName { iri } => {
            let iri = expand(&graph, &iri);
            println!("{}", graph.get_local_name(&iri)?);
        }
        Command::Type { iri, kind } => {
            let iri = expand(&graph, &iri);
            let shape = match kind {
                Kind::Object => graph.get_object_type(&iri),
                Kind::Interface => graph.get_interface_type(&iri),
                Kind::Edge => graph.get_edge_type(&iri),
                Kind::Connection => graph.get_connection_type(&iri),
            }
            .with_context(|| format!("Failed to resolve type of {iri}"))?;
            let json = serde_json::to_string_pretty(&shape)
                .context("Failed to serialize type shape to JSON")?;
            println!("{json}");
        }
        Command::Dump { out } => {
            let nt = ntriples::to_ntriples(&graph);
            match out {
                Some(path) => {
                    fs::write(&path, &nt)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("  Written: {}", path.display());
                }
                None => print!("{nt}"),
            }
        }
    }

    Ok(())
}

/// The CLI has no application data behind the graph: nodes never resolve, and
/// values are classified by an `@type` key when one is present.
fn resolvers() -> ResolverBundle {
    ResolverBundle::new()
        .resolve_resource(|_id, _context, _info| None)
        .resolve_source_class_iri(|value| {
            value.get("@type").and_then(Value::as_str).map(str::to_owned)
        })
}

/// Accepts either a full IRI or a `prefix:local` name with a known prefix.
fn expand(graph: &SemanticGraph, name: &str) -> String {
    if graph.contains(name) {
        return name.to_owned();
    }
    graph
        .prefixes()
        .expand(name)
        .unwrap_or_else(|| name.to_owned())
}
