use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tessera_graph::GraphFormat;

/// Log level for tracing output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Only errors
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// All messages including trace
    Trace,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "Schema-driven CSV to RDF export and cross-source graph integration")]
#[command(version)]
pub struct Cli {
    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Shorthand for --log-level debug
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to $TESSERA_CONFIG, then the user config dir)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log directive requested on the command line, if any
    pub fn requested_log_level(&self) -> Option<&'static str> {
        match (self.log_level, self.verbose) {
            (Some(level), _) => Some(level.as_str()),
            (None, true) => Some(LogLevel::Debug.as_str()),
            (None, false) => None,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest a CSV file against a schema descriptor and export it as Turtle
    Csv {
        /// CSV file with a header row
        input: PathBuf,

        /// Schema descriptor (TOML)
        schema: PathBuf,

        /// Turtle file to write
        output: PathBuf,

        /// Prefix name for exported IRIs (overrides export.prefix)
        #[arg(long)]
        prefix: Option<String>,

        /// Namespace bound to the prefix (overrides export.base_iri)
        #[arg(long)]
        base_iri: Option<String>,

        /// Derive subjects from this field instead of the descriptor's identifier
        #[arg(long, conflicts_with = "counter")]
        identifier: Option<String>,

        /// Number subjects 1, 2, 3... even when the descriptor names an identifier
        #[arg(long)]
        counter: bool,
    },

    /// Re-serialize a graph as Turtle using a prefix map file
    Convert {
        /// Graph file to read
        input: PathBuf,

        /// Prefix map with one `shortName,fullIRI` pair per line
        prefixes: PathBuf,

        /// Turtle file to write
        output: PathBuf,

        /// Input syntax (turtle, ntriples, nquads, trig, rdfxml); guessed from the extension when omitted
        #[arg(short, long)]
        format: Option<GraphFormat>,
    },

    /// Merge named datasets, link equivalent entities and unify their ontologies
    #[command(
        override_usage = "tessera integrate [--unified-namespace <NS>] <OUTPUT> <COUNT> (<NAME> <FILE>)... <IDENTIFYING_PROPERTY> <UNIFIED_CLASS> <CLASS>..."
    )]
    Integrate {
        /// Turtle file to write the combined graph to
        output: PathBuf,

        /// Namespace for the unified class and properties (overrides integrate.unified_namespace)
        #[arg(long)]
        unified_namespace: Option<String>,

        /// Number of name/file pairs that follow
        count: usize,

        /// Name/file pairs, then the identifying property, the unified class
        /// and the classes to unify
        #[arg(required = true, num_args = 1..)]
        args: Vec<String>,
    },

    /// Run a SPARQL query against one graph under RDFS entailment
    Query {
        /// File holding the query text
        query: PathBuf,

        /// Graph file to query
        graph: PathBuf,
    },

    /// Send a CONSTRUCT query to a remote SPARQL endpoint and save the result as Turtle
    Request {
        /// Endpoint URL, e.g. https://dbpedia.org/sparql
        endpoint: String,

        /// File holding the CONSTRUCT query
        query: PathBuf,

        /// Turtle file to write
        output: PathBuf,
    },

    /// Repair whitespace in the IRIs of an N-Triples dump and write it as prefixed Turtle
    Clean {
        /// N-Triples file to read
        input: PathBuf,

        /// Turtle file to write
        output: PathBuf,
    },
}
