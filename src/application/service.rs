use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::{parse_amount, parse_rate, Invoice, LineItem};
use crate::io::import::{import_items_csv, read_document, ImportError, InvoiceDocument};

use super::AppError;

/// Output format for a rendered invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "table" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything a client can supply to assemble an invoice.
/// Flags win over the input document; item sources are appended in the order
/// document, `items`, then `items_csv`.
#[derive(Debug, Clone, Default)]
pub struct InvoiceRequest {
    pub customer: Option<String>,
    pub tax_rate: Option<String>,
    pub items: Vec<String>,
    pub items_csv: Option<PathBuf>,
    pub input: Option<PathBuf>,
}

/// Result of assembling an invoice
pub struct BuildResult {
    pub invoice: Invoice,
    /// CSV rows that could not be parsed and were left out
    pub skipped: Vec<ImportError>,
}

/// Assemble an invoice from a request, reading any referenced files.
pub fn build_invoice(request: &InvoiceRequest) -> Result<BuildResult, AppError> {
    let mut document = match (&request.input, &request.customer) {
        (Some(path), _) => read_document(open_file(path)?)?,
        (None, Some(customer)) => InvoiceDocument::new(customer.clone()),
        (None, None) => return Err(AppError::MissingCustomer),
    };

    if let Some(customer) = &request.customer {
        document.customer_name = customer.clone();
    }
    if let Some(raw) = &request.tax_rate {
        let rate = parse_rate(raw)
            .map_err(|e| AppError::InvalidTaxRate(format!("'{}': {}", raw.trim(), e)))?;
        document.tax_rate = Some(rate);
    }

    let mut invoice = document.into_invoice()?;

    for spec in &request.items {
        invoice.add_line(parse_item_spec(spec)?);
    }

    let mut skipped = Vec::new();
    if let Some(path) = &request.items_csv {
        let result = import_items_csv(open_file(path)?, &mut invoice)?;
        debug!(
            path = %path.display(),
            imported = result.imported,
            skipped = result.errors.len(),
            "items imported from CSV"
        );
        skipped = result.errors;
    }

    info!(
        customer = %invoice.customer_name(),
        items = invoice.items().len(),
        skipped = skipped.len(),
        "invoice assembled"
    );

    Ok(BuildResult { invoice, skipped })
}

/// Parse a `NAME:PRICE[:QTY]` item specification.
/// Example: "Widget:10.00:2", "Consulting:150"
pub fn parse_item_spec(spec: &str) -> Result<LineItem, AppError> {
    let mut parts = spec.splitn(3, ':');

    let name = parts
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::InvalidItem(format!("'{}': missing name", spec)))?;

    let price_str = parts.next().ok_or_else(|| {
        AppError::InvalidItem(format!("'{}': expected NAME:PRICE[:QTY]", spec))
    })?;
    let unit_price = parse_amount(price_str)
        .map_err(|e| AppError::InvalidAmount(format!("'{}': {}", price_str.trim(), e)))?;

    let quantity = match parts.next() {
        Some(qty) => parse_quantity(qty)?,
        None => 1,
    };

    Ok(LineItem::new(name, unit_price).with_quantity(quantity))
}

/// Parse a quantity, rejecting negative and fractional values.
pub fn parse_quantity(input: &str) -> Result<u32, AppError> {
    let input = input.trim();
    let value: i64 = input.parse().map_err(|_| {
        AppError::InvalidItem(format!("quantity '{}' is not a whole number", input))
    })?;
    u32::try_from(value).map_err(|_| {
        AppError::InvalidItem(format!(
            "quantity {} must be between 0 and {}",
            value,
            u32::MAX
        ))
    })
}

fn open_file(path: &Path) -> Result<File, AppError> {
    File::open(path).map_err(|source| AppError::ReadFile {
        path: path.display().to_string(),
        source,
    })
}
