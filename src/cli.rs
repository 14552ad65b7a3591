use crate::es::EsClient;
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Default level of verbosity is INFO.
    #[arg(short = 'v', long, value_enum, default_value_t = Verbosity::Info, global = true)]
    pub verbosity: Verbosity,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Verbosity {
    Info,
    Debug,
    Warn,
    Error,
}

impl Verbosity {
    pub fn filter(&self) -> &'static str {
        match self {
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
            Verbosity::Warn => "warn",
            Verbosity::Error => "error",
        }
    }
}

/// Connection options shared by every loader subcommand.
#[derive(clap::Args)]
pub struct EsOpts {
    /// The search server hostname.
    #[arg(short = 'H', long, default_value = "localhost")]
    pub host: String,

    /// The search server port.
    #[arg(short, long, default_value_t = 9200)]
    pub port: u16,

    /// Connect over SSL.
    #[arg(long)]
    pub use_ssl: bool,

    /// Username
    #[arg(short, long)]
    pub username: Option<String>,

    /// Password
    #[arg(short = 'P', long)]
    pub password: Option<String>,
}

impl EsOpts {
    pub fn client(&self) -> Result<EsClient> {
        let auth = match (&self.username, &self.password) {
            (Some(user), Some(password)) => Some((user.clone(), password.clone())),
            _ => None,
        };
        EsClient::new(&self.host, self.port, self.use_ssl, auth)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a full dashboard (analysis entry, tree, segs, metrics) from a
    /// YAML configuration file
    LoadDashboard {
        /// Configuration file in Yaml format
        #[arg(short = 'y', long)]
        yaml_file: PathBuf,

        #[command(flatten)]
        es: EsOpts,
    },

    /// Parse a tree file and load its heatmap layout records
    LoadTree {
        /// Index name
        #[arg(short, long)]
        index: String,

        /// Tree data file (.newick or .gml)
        #[arg(short = 'g', long)]
        tree_file: Option<PathBuf>,

        /// Ordering file for tree
        #[arg(long)]
        ordering_file: Option<PathBuf>,

        /// Node ID to root the tree at
        #[arg(short, long)]
        root: Option<String>,

        /// CSV file of tree edges
        #[arg(short, long)]
        edges: Option<PathBuf>,

        #[command(flatten)]
        es: EsOpts,
    },

    /// Load per-cell genomic bin data
    LoadBins {
        /// Index name
        #[arg(short, long)]
        index: String,

        /// Bin data file
        #[arg(short, long)]
        bin_file: PathBuf,

        #[command(flatten)]
        es: EsOpts,
    },

    /// Load segment data
    LoadSegs {
        /// Index name
        #[arg(short, long)]
        index: String,

        /// Segs data file
        #[arg(short, long)]
        segs_file: PathBuf,

        #[command(flatten)]
        es: EsOpts,
    },

    /// Load per-cell QC metric data
    LoadMetrics {
        /// Index name
        #[arg(short, long)]
        index: String,

        /// Metrics data file
        #[arg(short, long)]
        metrics_file: PathBuf,

        #[command(flatten)]
        es: EsOpts,
    },

    /// Compute mode-normalized segments from a loaded bin index
    NormalizeSegs {
        /// Name of index with bin data
        #[arg(short, long)]
        bin_index: String,

        /// Name of index to load segment data in
        #[arg(short, long)]
        segs_index: String,

        #[command(flatten)]
        es: EsOpts,
    },
}
