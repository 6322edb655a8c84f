use clap::{Parser, Subcommand};
use fiberlens_core::{BlockLocation, InspectBlockOperation, InspectBlockResult, StoreConfig};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "fiberlens")]
#[command(about = "Locate and verify content blocks in a two-tier fiber store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Locate a block by logical key, stream it and report its digest
    Inspect {
        /// Logical block key
        #[arg(short, long)]
        key: String,

        /// Storage root directory
        #[arg(short, long)]
        root: PathBuf,

        /// Block size threshold in bytes (overrides the store profile)
        #[arg(short = 's', long)]
        size_threshold: Option<u64>,

        /// Number of chunked-store partitions (overrides the store profile)
        #[arg(short = 'n', long)]
        partitions: Option<usize>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fiberlens=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect {
            key,
            root,
            size_threshold,
            partitions,
        } => {
            let mut config = match StoreConfig::for_root(root) {
                Ok(config) => config,
                Err(error) => {
                    tracing::error!("Failed to load store config: {}", error);
                    std::process::exit(1);
                }
            };

            if let Some(threshold) = size_threshold {
                config.size_threshold = threshold;
            }
            if let Some(count) = partitions {
                config.partition_count = count;
            }

            let operation = match InspectBlockOperation::new(config) {
                Ok(operation) => operation,
                Err(error) => {
                    tracing::error!("Invalid store configuration: {}", error);
                    std::process::exit(2);
                }
            };

            match operation.run(&key).await {
                Ok(result) => print_report(&result),
                Err(error) => {
                    tracing::error!("Inspect failed for key {}: {}", key, error);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn print_report(result: &InspectBlockResult) {
    let contract = &result.contract;
    let block = &result.block;

    println!("Contract information:");
    println!("  hash       : {}", contract.hash);
    println!("  size       : {}", contract.size);
    println!("  leaseBegin : {}", contract.lease_begin);
    println!("  leaseEnd   : {}", contract.lease_end);
    println!("  status     : {}", contract.status);

    println!("Block information:");
    println!("  store      : {}", block.store);
    println!("  key        : {}", block.internal_key);
    match &block.location {
        BlockLocation::File(path) => println!("  path       : {}", path.display()),
        BlockLocation::Partition(index) => println!("  partition  : {}", index),
    }
    if let Some(count) = block.chunk_count {
        println!("  chunks     : {}", count);
    }
    println!("  bytes      : {}", block.size_bytes);
    println!("  digest     : {}", block.digest);
}
