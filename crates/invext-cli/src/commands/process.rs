//! Process command - extract data from a single recognized-text file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use invext_core::invoice::{ExtractionResult, InvoiceParser, PatternInvoiceParser};
use invext_core::models::invoice::InvoiceRecord;
use invext_core::ocr::{OcrResult, TextRecognizer, TranscriptRecognizer};
use invext_core::render::{render_side_by_side, render_text};
use invext_core::InvextConfig;

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input transcript file, or `-` to read stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Validate extracted data
    #[arg(long)]
    validate: bool,

    /// Show extraction warnings
    #[arg(long)]
    show_warnings: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per line item
    Csv,
    /// Plain text summary
    Text,
    /// Side-by-side HTML comparison
    Html,
}

impl OutputFormat {
    /// Resolve the format from the command line or the configured default.
    pub fn resolve(arg: Option<Self>, config: &InvextConfig) -> anyhow::Result<Self> {
        match arg {
            Some(format) => Ok(format),
            None => Self::from_str(&config.output.default_format, true).map_err(|_| {
                anyhow::anyhow!(
                    "Unknown output format in config: {}",
                    config.output.default_format
                )
            }),
        }
    }

    /// File extension for written outputs.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
            OutputFormat::Html => "html",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let format = OutputFormat::resolve(args.format, &config)?;
    let parser = PatternInvoiceParser::from_config(&config.extraction)?;

    let from_stdin = args.input.as_os_str() == "-";

    if !from_stdin && !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Reading recognized text...");
    pb.set_position(10);

    let ocr = if from_stdin {
        OcrResult::new(io::read_to_string(io::stdin())?, config.ocr.language.as_str(), "stdin")
    } else {
        TranscriptRecognizer::from_config(&config.ocr).recognize(&args.input)?
    };

    if ocr.is_blank() {
        warn!("No text recognized in {}", ocr.source);
    }

    pb.set_message("Extracting invoice data...");
    pb.set_position(50);

    let result = parser.parse(&ocr.text);

    pb.set_position(100);
    pb.finish_and_clear();

    if args.validate {
        let issues = result.invoice.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    if args.show_warnings && !result.warnings.is_empty() {
        eprintln!("{}", style("Extraction warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    let output = format_result(&result, format, config.output.pretty_json)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Read and extract one transcript.
pub fn extract_file(
    path: &Path,
    recognizer: &TranscriptRecognizer,
    parser: &PatternInvoiceParser,
) -> anyhow::Result<ExtractionResult> {
    let ocr = recognizer.recognize(path)?;
    if ocr.is_blank() {
        warn!("No text recognized in {}", path.display());
    }
    Ok(parser.parse(&ocr.text))
}

/// Format an extraction result.
pub fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    pretty_json: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty_json => Ok(serde_json::to_string_pretty(&result.invoice)?),
        OutputFormat::Json => Ok(serde_json::to_string(&result.invoice)?),
        OutputFormat::Csv => format_csv(&result.invoice),
        OutputFormat::Text => Ok(render_text(&result.invoice)),
        OutputFormat::Html => Ok(render_side_by_side(&result.raw_text, &result.invoice)),
    }
}

fn format_csv(invoice: &InvoiceRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "invoice_number",
        "billed_to",
        "pay_to",
        "bank",
        "account_name",
        "account_number",
        "bsb",
        "description",
        "rate",
        "hours",
        "amount",
        "subtotal",
        "discount",
        "total",
    ])?;

    let bank = invoice.bank_details.clone().unwrap_or_default();
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    let header = [
        text(&invoice.invoice_number),
        text(&invoice.billed_to),
        text(&invoice.pay_to),
        text(&bank.bank),
        text(&bank.account_name),
        text(&bank.account_number),
        text(&bank.bsb),
    ];
    let totals = [
        text(&invoice.subtotal),
        text(&invoice.discount),
        text(&invoice.total),
    ];

    // One row per line item; an invoice without items still gets a row
    let items: Vec<[String; 4]> = if invoice.line_items.is_empty() {
        vec![Default::default()]
    } else {
        invoice
            .line_items
            .iter()
            .map(|i| {
                [
                    i.description.clone(),
                    i.rate.clone(),
                    i.hours.clone(),
                    i.amount.clone(),
                ]
            })
            .collect()
    };

    for item in &items {
        wtr.write_record(header.iter().chain(item.iter()).chain(totals.iter()))?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}
