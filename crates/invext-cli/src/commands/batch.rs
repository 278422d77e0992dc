//! Batch processing command for multiple recognized-text files.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use invext_core::invoice::{ExtractionResult, PatternInvoiceParser};
use invext_core::ocr::{TextRecognizer, TranscriptRecognizer};

use super::load_config;
use super::process::{extract_file, format_result, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching input files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    extraction: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let format = OutputFormat::resolve(args.format, &config)?;
    let parser = Arc::new(PatternInvoiceParser::from_config(&config.extraction)?);
    let recognizer = Arc::new(TranscriptRecognizer::from_config(&config.ocr));

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| recognizer.supports(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        check_output_names(&files)?;
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    // Extraction is synchronous; bound the blocking workers by --jobs
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for path in files {
        let permit = semaphore.clone().acquire_owned().await?;
        let parser = Arc::clone(&parser);
        let recognizer = Arc::clone(&recognizer);

        tasks.spawn_blocking(move || {
            let _permit = permit;
            let file_start = Instant::now();
            let result = extract_file(&path, &recognizer, &parser);
            let processing_time_ms = file_start.elapsed().as_millis() as u64;

            match result {
                Ok(extraction) => ProcessResult {
                    path,
                    extraction: Some(extraction),
                    error: None,
                    processing_time_ms,
                },
                Err(e) => ProcessResult {
                    path,
                    extraction: None,
                    error: Some(e.to_string()),
                    processing_time_ms,
                },
            }
        });
    }

    let mut results = Vec::new();

    while let Some(joined) = tasks.join_next().await {
        let result = joined?;

        if let Some(error_msg) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                tasks.abort_all();
                anyhow::bail!("Processing failed: {}", error_msg);
            }
        }

        results.push(result);
        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    results.sort_by(|a, b| a.path.cmp(&b.path));

    let successful: Vec<_> = results.iter().filter(|r| r.extraction.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            if let Some(extraction) = &result.extraction {
                let output_path = output_dir.join(format!(
                    "{}.{}",
                    output_name(&result.path),
                    format.extension()
                ));
                let content = format_result(extraction, format, config.output.pretty_json)?;

                fs::write(&output_path, content)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn output_name(path: &Path) -> &str {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("invoice")
}

/// Outputs are flattened into one directory; refuse inputs sharing a name.
fn check_output_names(files: &[PathBuf]) -> anyhow::Result<()> {
    let mut seen: HashMap<&str, &Path> = HashMap::new();

    for path in files {
        if let Some(previous) = seen.insert(output_name(path), path) {
            anyhow::bail!(
                "Output name collision: {} and {} would both be written as '{}'",
                previous.display(),
                path.display(),
                output_name(path)
            );
        }
    }

    Ok(())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "invoice_number",
        "billed_to",
        "pay_to",
        "line_items",
        "subtotal",
        "discount",
        "total",
        "missing_fields",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(extraction) = &result.extraction {
            let invoice = &extraction.invoice;
            let missing = extraction
                .missing_fields
                .iter()
                .map(|f| f.key())
                .collect::<Vec<_>>()
                .join(";");

            wtr.write_record([
                filename,
                "success",
                invoice.invoice_number.as_deref().unwrap_or(""),
                invoice.billed_to.as_deref().unwrap_or(""),
                invoice.pay_to.as_deref().unwrap_or(""),
                &invoice.line_items.len().to_string(),
                invoice.subtotal.as_deref().unwrap_or(""),
                invoice.discount.as_deref().unwrap_or(""),
                invoice.total.as_deref().unwrap_or(""),
                &missing,
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_output_names() {
        let distinct = vec![PathBuf::from("in/a.txt"), PathBuf::from("in/b.txt")];
        assert!(check_output_names(&distinct).is_ok());

        let colliding = vec![PathBuf::from("in/a/inv.txt"), PathBuf::from("in/b/inv.txt")];
        let err = check_output_names(&colliding).unwrap_err().to_string();
        assert!(err.contains("in/a/inv.txt"));
        assert!(err.contains("'inv'"));
    }

    #[test]
    fn test_output_name_falls_back() {
        assert_eq!(output_name(Path::new("scans/march.txt")), "march");
        assert_eq!(output_name(Path::new("")), "invoice");
    }
}
