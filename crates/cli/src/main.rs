use anyhow::Result;
use clap::{Parser, Subcommand};
use cortex_core::config::{self, AppConfig};
use cortex_core::pipeline;
use cortex_core::taxonomy::CONCEPT_QUERIES;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::ExportWisdom {
            output,
            page_size,
            json,
        } => {
            if let Some(size) = page_size {
                cfg.database.page_size = size;
            }
            run_export_wisdom(cfg, output, json).await
        }
        Commands::ExportQueries {
            output,
            concurrency,
            json,
        } => {
            if let Some(n) = concurrency {
                cfg.exporter.concurrency = n;
            }
            run_export_queries(cfg, output, json).await
        }
        Commands::Serve { port } => {
            if let Some(port) = port {
                cfg.web.port = port;
            }
            web::server::run_server(&cfg.web).await
        }
    }
}

#[derive(Parser)]
#[command(name = "cortex")]
#[command(about = "Exporters and search page for The Cortex knowledge base", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump every chunk grouped by transcript, with concept statistics
    ExportWisdom {
        /// Output file (defaults to exporter.bulk_output)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Rows per page request
        #[arg(long)]
        page_size: Option<usize>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run every concept query (semantic + keyword) and dump the results
    ExportQueries {
        /// Output file (defaults to exporter.query_output)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Queries in flight at once
        #[arg(long)]
        concurrency: Option<usize>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the search page
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

async fn run_export_wisdom(cfg: AppConfig, output: Option<PathBuf>, json: bool) -> Result<()> {
    cfg.validate_for_bulk()?;
    let store = pipeline::build_store(&cfg)?;
    let output = output.unwrap_or_else(|| PathBuf::from(&cfg.exporter.bulk_output));

    info!("Full Cortex extraction into {}", output.display());
    let summary = pipeline::run_bulk_export(&cfg, &store, &output).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "export-wisdom: {} chunks, {} transcripts, {} bytes -> {}",
            summary.total_chunks,
            summary.total_sources,
            summary.bytes_written,
            output.display()
        );
        if summary.missing_rows > 0 {
            println!(
                "warning: {} rows reported by the store were not fetched; lower --page-size",
                summary.missing_rows
            );
        }
    }
    Ok(())
}

async fn run_export_queries(cfg: AppConfig, output: Option<PathBuf>, json: bool) -> Result<()> {
    cfg.validate_for_queries()?;
    let store = pipeline::build_store(&cfg)?;
    let registry = pipeline::build_registry(&cfg);
    let embedder = registry.embedding(None)?;
    let output = output.unwrap_or_else(|| PathBuf::from(&cfg.exporter.query_output));

    info!("Concept query extraction into {}", output.display());
    let summary =
        pipeline::run_query_export(&cfg, embedder.as_ref(), &store, CONCEPT_QUERIES, &output)
            .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "export-queries: {} queries, {} failed, {} bytes -> {}",
            summary.total_queries,
            summary.failed_queries,
            summary.bytes_written,
            output.display()
        );
    }
    Ok(())
}
