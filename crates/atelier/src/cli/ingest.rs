//! The `atelier ingest` command: run files through the upload pipeline.

use anyhow::Context;
use atelier_core::{slugify, Config, Ingestor, UploadResult};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions considered ingestible when scanning directories.
const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "gif", "bmp", "tif", "tiff", "heic", "avif",
];

/// Arguments for the `ingest` command.
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Photo files or directories to ingest (directories are recursed)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Photo title, used to derive the catalog slug (single-photo ingests)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Output file for catalog records (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// One catalog record per ingested photo, emitted as a JSON line.
#[derive(Serialize)]
struct IngestRecord {
    slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(flatten)]
    upload: UploadResult,
}

/// Execute the ingest command.
pub async fn execute(args: IngestArgs, config: Config) -> anyhow::Result<()> {
    let ingestor = Ingestor::new(&config)?;
    let files = collect_files(&args.paths)?;

    if files.is_empty() {
        anyhow::bail!("No ingestible files found");
    }

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Cannot create output file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(std::io::stdout().lock()),
    };

    let progress = if files.len() > 1 {
        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                .expect("static progress template"),
        );
        Some(bar)
    } else {
        None
    };

    let mut succeeded = 0usize;
    let mut failed = 0usize;

    for path in &files {
        if let Some(bar) = &progress {
            bar.set_message(
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );
        }

        match ingest_one(&ingestor, path, args.title.as_deref()).await {
            Ok(record) => {
                let json = serde_json::to_string(&record)?;
                writeln!(writer, "{}", json)?;
                succeeded += 1;
            }
            Err(e) => {
                // A bad file doesn't abort the batch
                tracing::error!("Failed to ingest {}: {:#}", path.display(), e);
                failed += 1;
            }
        }

        if let Some(bar) = &progress {
            bar.inc(1);
        }
    }

    if let Some(bar) = &progress {
        bar.finish_and_clear();
    }
    writer.flush()?;

    tracing::info!("Ingested {} photo(s), {} failed", succeeded, failed);
    if succeeded == 0 {
        anyhow::bail!("All {} file(s) failed to ingest", failed);
    }
    Ok(())
}

async fn ingest_one(
    ingestor: &Ingestor,
    path: &Path,
    title: Option<&str>,
) -> anyhow::Result<IngestRecord> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Cannot read {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");

    let upload = ingestor.ingest(bytes, name).await?;
    Ok(IngestRecord {
        slug: slugify(title),
        title: title.map(str::to_string),
        upload,
    })
}

/// Expand the argument paths into a flat list of ingestible files.
fn collect_files(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
                if entry.file_type().is_file() && has_supported_extension(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            anyhow::bail!("No such file or directory: {}", path.display());
        }
    }
    files.sort();
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}
