use chrono::Utc;
use clap::{Parser, Subcommand};
use doc_analytics_core::{
    stats, BatchReport, ClassificationResult, ClassifierOptions, ClassifierPredictor,
    ClassifierTrainer, FailurePolicy, Repository, SearchEngine, Sorter, DEFAULT_MODEL_FILE,
    DEFAULT_STORE_DIR,
};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "doc-analytics", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory holding the stored documents
    #[arg(long, env = "DOC_ANALYTICS_STORE", default_value = DEFAULT_STORE_DIR)]
    store_dir: PathBuf,

    /// Location of the trained classifier model
    #[arg(long, env = "DOC_ANALYTICS_MODEL", default_value = DEFAULT_MODEL_FILE)]
    model_path: PathBuf,

    /// Skip unreadable documents instead of failing the whole command.
    #[arg(long, default_value_t = false)]
    skip_unreadable: bool,

    /// Print results as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Copy a local file into the store, replacing any file of the same name.
    Upload {
        /// File to upload.
        file: PathBuf,
        /// Name to store it under; defaults to the file's own name.
        #[arg(long)]
        name: Option<String>,
    },
    /// List stored documents.
    List,
    /// Print the on-disk path of a stored document.
    Path { filename: String },
    /// List documents ordered by extracted title.
    Sort,
    /// List documents containing every comma-separated keyword.
    Search {
        #[arg(long)]
        keywords: String,
    },
    /// Train the classifier from paired --file/--label arguments.
    Train {
        #[arg(long = "file")]
        files: Vec<String>,
        #[arg(long = "label")]
        labels: Vec<String>,
        /// Additive smoothing for the naive Bayes term estimates.
        #[arg(long, default_value_t = ClassifierOptions::default().smoothing_alpha)]
        alpha: f64,
    },
    /// Label every stored document with the trained classifier.
    Classify,
    /// Show document count and total size.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    let repository = Repository::new(&cli.store_dir, &cli.model_path)
        .map_err(|error| anyhow::anyhow!(error.to_string()))?;
    let policy = if cli.skip_unreadable {
        FailurePolicy::Skip
    } else {
        FailurePolicy::Abort
    };

    info!(
        version = app_version,
        store = %cli.store_dir.display(),
        model = %cli.model_path.display(),
        started_at = %Utc::now().to_rfc3339(),
        "doc-analytics boot"
    );

    match cli.command {
        Command::Upload { file, name } => {
            let name = match name {
                Some(name) => name,
                None => file_name_of(&file)?,
            };
            let store = repository.store().clone();
            let saved = blocking(move || {
                let source = File::open(&file)?;
                Ok(store.save(&name, source)?)
            })
            .await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&saved)?);
            } else {
                println!("uploaded {} ({} bytes)", saved.filename, saved.size_bytes);
            }
        }
        Command::List => {
            let store = repository.store().clone();
            let documents = blocking(move || Ok(store.list()?)).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&documents)?);
            } else {
                for document in documents {
                    println!(
                        "{}\t{}\t{}",
                        document.filename,
                        document.format.as_str(),
                        document.size_bytes
                    );
                }
            }
        }
        Command::Path { filename } => {
            let store = repository.store().clone();
            let path = blocking(move || Ok(store.resolve_path(&filename)?)).await?;
            println!("{}", path.display());
        }
        Command::Sort => {
            let sorter = Sorter::new(repository);
            let report = blocking(move || Ok(sorter.sort_with_policy(policy)?)).await?;
            print_filenames(report, cli.json)?;
        }
        Command::Search { keywords } => {
            let keywords = parse_keywords(&keywords);
            info!(keywords = ?keywords, "searching");
            let engine = SearchEngine::new(repository);
            let report =
                blocking(move || Ok(engine.search_with_policy(&keywords, policy)?)).await?;
            print_filenames(report, cli.json)?;
        }
        Command::Train {
            files,
            labels,
            alpha,
        } => {
            let trainer = ClassifierTrainer::with_options(
                repository,
                ClassifierOptions {
                    smoothing_alpha: alpha,
                },
            );
            let model = blocking(move || Ok(trainer.train_from_lists(&files, &labels)?)).await?;

            println!(
                "model trained on {} documents with labels: {}",
                model.training_documents,
                model.labels().join(", ")
            );
        }
        Command::Classify => {
            let predictor = ClassifierPredictor::new(repository);
            if !predictor.is_trained() {
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&untrained_json())?);
                } else {
                    println!("model not trained yet; run `train` first");
                }
                return Ok(());
            }

            let report = blocking(move || Ok(predictor.classify_with_policy(policy)?)).await?;
            print_classifications(report, cli.json)?;
        }
        Command::Stats => {
            let statistics = blocking(move || Ok(stats(&repository)?)).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&statistics)?);
            } else {
                println!(
                    "documents={} total_size_bytes={} total_size_kb={:.2}",
                    statistics.count,
                    statistics.total_size_bytes,
                    statistics.total_size_kb()
                );
            }
        }
    }

    Ok(())
}

/// Runs store and extraction work on the blocking pool.
async fn blocking<T, F>(work: F) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work).await?
}

/// Splits on commas, trims each piece and drops empty ones.
fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
        .collect()
}

fn file_name_of(path: &Path) -> anyhow::Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("path has no usable file name: {}", path.display()))
}

fn report_skipped<T>(report: &BatchReport<T>) {
    if !report.is_complete() {
        warn!("skipped_files={}", report.skipped.len());
        for skipped in &report.skipped {
            warn!(filename = %skipped.filename, reason = %skipped.reason, "skipped document");
        }
    }
}

fn print_filenames(report: BatchReport<String>, json: bool) -> anyhow::Result<()> {
    report_skipped(&report);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.items.is_empty() {
        println!("no documents");
    } else {
        for filename in report.items {
            println!("{filename}");
        }
    }
    Ok(())
}

fn print_classifications(
    report: BatchReport<ClassificationResult>,
    json: bool,
) -> anyhow::Result<()> {
    report_skipped(&report);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for result in report.items {
            println!("{}\t{}", result.filename, result.label);
        }
    }
    Ok(())
}

fn untrained_json() -> serde_json::Value {
    serde_json::json!({
        "trained": false,
        "items": [],
        "skipped": [],
    })
}
