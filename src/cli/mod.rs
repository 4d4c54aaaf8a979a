use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

use crate::application::{build_invoice, BuildResult, InvoiceRequest, ReportFormat};
use crate::io::{Exporter, ImportError};
use crate::logging;

/// Invoicer - invoice totals and summaries
#[derive(Parser)]
#[command(name = "invoicer")]
#[command(about = "Compute invoice subtotals, tax and totals, and print a fixed-layout summary")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the invoice summary
    Summary {
        #[command(flatten)]
        invoice: InvoiceArgs,

        /// Output format: text, json, csv
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Export the invoice report to a file
    Export {
        #[command(flatten)]
        invoice: InvoiceArgs,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Format: json, csv, text
        #[arg(short, long, default_value = "json")]
        format: String,
    },
}

/// Sources for the invoice being built
#[derive(Args)]
pub struct InvoiceArgs {
    /// Customer name (overrides the input document)
    #[arg(short, long)]
    pub customer: Option<String>,

    /// Tax rate as a fraction or percentage (e.g., "0.08" or "8%"; defaults to 8%)
    #[arg(short, long)]
    pub tax_rate: Option<String>,

    /// Line item as NAME:PRICE[:QTY] (repeatable, e.g., "Widget:10.00:2")
    #[arg(short, long = "item")]
    pub items: Vec<String>,

    /// CSV file with a header and name,unit_price[,quantity] rows
    #[arg(long)]
    pub items_csv: Option<PathBuf>,

    /// JSON invoice document to start from
    #[arg(long)]
    pub input: Option<PathBuf>,
}

impl From<InvoiceArgs> for InvoiceRequest {
    fn from(args: InvoiceArgs) -> Self {
        Self {
            customer: args.customer,
            tax_rate: args.tax_rate,
            items: args.items,
            items_csv: args.items_csv,
            input: args.input,
        }
    }
}

impl Cli {
    pub fn run(self) -> Result<()> {
        logging::init(self.verbose);

        match self.command {
            Commands::Summary { invoice, format } => {
                let format = parse_format(&format)?;
                let result = assemble(invoice)?;
                debug!(%format, "rendering invoice");

                let rendered = Exporter::new(&result.invoice).render(format)?;
                println!("{}", rendered);
            }

            Commands::Export {
                invoice,
                output,
                format,
            } => {
                let format = parse_format(&format)?;
                let result = assemble(invoice)?;
                run_export_command(&result, output, format)?;
            }
        }

        Ok(())
    }
}

fn parse_format(format: &str) -> Result<ReportFormat> {
    ReportFormat::from_str(format)
        .with_context(|| format!("Invalid format '{}'. Valid formats: text, json, csv", format))
}

fn assemble(args: InvoiceArgs) -> Result<BuildResult> {
    let request = InvoiceRequest::from(args);
    let result = build_invoice(&request).context("Could not build invoice")?;
    print_skipped(&result.skipped);
    Ok(result)
}

fn run_export_command(
    result: &BuildResult,
    output: Option<PathBuf>,
    format: ReportFormat,
) -> Result<()> {
    use std::fs::File;
    use std::io::stdout;

    let exporter = Exporter::new(&result.invoice);

    // Determine output writer
    let mut writer: Box<dyn Write> = match &output {
        Some(path) => {
            let file = File::create(path).with_context(|| {
                format!("Failed to create output file: {}", path.display())
            })?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match format {
        ReportFormat::Json => {
            let report = exporter.export_report_json(writer)?;
            if output.is_some() {
                eprintln!(
                    "Exported invoice for {}: {} line items, total {}",
                    report.customer_name,
                    report.lines.len(),
                    report.total
                );
            }
        }
        ReportFormat::Csv => {
            let count = exporter.export_lines_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} line items", count);
            }
        }
        ReportFormat::Text => {
            writeln!(writer, "{}", result.invoice.generate_summary())?;
            writer.flush()?;
        }
    }

    Ok(())
}

fn print_skipped(errors: &[ImportError]) {
    let _ = write_skipped(std::io::stderr(), errors);
}

fn write_skipped<W: Write>(mut writer: W, errors: &[ImportError]) -> std::io::Result<()> {
    if errors.is_empty() {
        return Ok(());
    }

    writeln!(writer, "Skipped {} item row(s):", errors.len())?;
    for error in errors.iter().take(10) {
        writeln!(
            writer,
            "  Line {}: {}{}",
            error.line,
            error
                .field
                .as_ref()
                .map(|f| format!("{}: ", f))
                .unwrap_or_default(),
            error.error
        )?;
    }
    if errors.len() > 10 {
        writeln!(writer, "  ... and {} more errors", errors.len() - 10)?;
    }
    Ok(())
}
