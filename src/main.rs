use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;

use docbulk::config::{ImportConfig, StoreConfig};
use docbulk::import::{BulkImporter, Document};
use docbulk::store::HttpDocumentStore;

#[derive(Parser, Debug)]
#[command(
    name = "docbulk",
    about = "Bulk-load JSON documents into a remote document store"
)]
struct Args {
    /// Newline-delimited JSON file of documents to import.
    #[arg(long)]
    input: PathBuf,

    /// Target collection name (overrides DOCBULK_COLLECTION).
    #[arg(long)]
    collection: Option<String>,

    /// Fail on existing ids instead of replacing the documents.
    #[arg(long)]
    no_upsert: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    let mut config = ImportConfig::from_env();
    if let Some(collection) = args.collection {
        config.collection = collection;
    }
    if args.no_upsert {
        config.upsert = false;
    }

    let raw = std::fs::read_to_string(&args.input)?;
    let mut documents = Vec::new();
    for (lineno, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: serde_json::Value = serde_json::from_str(line)?;
        match Document::from_value(value) {
            Some(document) => documents.push(document),
            None => {
                writeln!(
                    io::stderr(),
                    "error: line {} of {} is not a JSON object",
                    lineno + 1,
                    args.input.display()
                )?;
                std::process::exit(1);
            }
        }
    }

    log::info!(
        "importing {} documents into '{}'",
        documents.len(),
        config.collection
    );

    let store = HttpDocumentStore::new(StoreConfig::from_env())?;
    let importer = BulkImporter::new(store, config);
    let stats = importer.import(documents).await?;

    log::info!(
        "done: {} documents, {} chunks, {} generated ids",
        stats.documents,
        stats.chunks,
        stats.generated_ids
    );
    Ok(())
}
