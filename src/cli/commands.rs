use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "eventcluster", about = "Cross-platform prediction market event clustering")]
pub struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Cluster a snapshot file (JSON array of listings)
    Cluster {
        /// Path to the snapshot file
        file: String,
        /// Jaccard threshold for cross-platform merges (overrides EVENTCLUSTER_SIMILARITY_THRESHOLD)
        #[arg(long)]
        threshold: Option<f64>,
        /// Worker threads for key extraction (overrides EVENTCLUSTER_WORKERS)
        #[arg(long)]
        workers: Option<usize>,
        /// Drop listings below this volume before clustering
        #[arg(long)]
        min_volume: Option<f64>,
        /// Markets to list per cluster in the summary
        #[arg(long, default_value = "3")]
        top: usize,
        /// Print full clusters instead of summaries
        #[arg(long)]
        full: bool,
    },
    /// Show the lookup keys and similarity words extracted from a text
    Keys {
        text: String,
    },
    /// Score the similarity of two texts
    Compare {
        a: String,
        b: String,
    },
}
