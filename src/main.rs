use clap::Parser;
use eventcluster::cli::commands::{Cli, Commands};
use eventcluster::domain::values::cluster_config::ClusterConfig;
use eventcluster::infrastructure::snapshot::json_file::JsonFileSource;
use eventcluster::infrastructure::telemetry::{init_telemetry, init_telemetry_json};
use eventcluster::EventClusterer;

fn main() {
    let cli = Cli::parse();
    if cli.json_logs {
        init_telemetry_json();
    } else {
        init_telemetry();
    }

    if let Err(e) = run_command(cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run_command(cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Cluster {
            file,
            threshold,
            workers,
            min_volume,
            top,
            full,
        } => {
            let mut config = ClusterConfig::from_env()?;
            if let Some(t) = threshold {
                config = config.with_threshold(t)?;
            }
            if let Some(w) = workers {
                config = config.with_workers(w)?;
            }

            let clusterer = EventClusterer::with_config(config);
            let scan = clusterer.scan_source(&JsonFileSource::new(&file), min_volume)?;

            if full {
                println!("{}", serde_json::to_string_pretty(&scan)?);
            } else {
                let summaries: Vec<_> = scan.clusters.iter().map(|c| c.summary(top)).collect();
                let report = serde_json::json!({
                    "scan_id": scan.scan_id,
                    "scanned_at": scan.scanned_at,
                    "listings_received": scan.listings_received,
                    "listings_clustered": scan.listings_clustered,
                    "native_groups": scan.native_groups,
                    "unkeyable_groups": scan.unkeyable_groups,
                    "merges": scan.merges,
                    "total_clusters": scan.total_clusters,
                    "elapsed_ms": scan.elapsed_ms as u64,
                    "snapshot_errors": scan.snapshot_errors,
                    "clusters": summaries,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Commands::Keys { text } => {
            let clusterer = EventClusterer::with_config(ClusterConfig::default());
            let profile = clusterer.explain(&text);
            let mut words: Vec<&String> = profile.words.iter().collect();
            words.sort();
            let report = serde_json::json!({
                "keys": profile.keys,
                "words": words,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Compare { a, b } => {
            let clusterer = EventClusterer::new()?;
            let score = clusterer.similarity(&a, &b);
            let threshold = clusterer.config().similarity_threshold;
            println!(
                "similarity {score:.3} (threshold {threshold}) → {}",
                if threshold.accepts(score) { "match" } else { "no match" }
            );
        }
    }
    Ok(())
}
