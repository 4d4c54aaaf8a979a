use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Read;

use crate::application::{parse_quantity, AppError};
use crate::domain::{parse_amount, Invoice, LineItem, DEFAULT_TAX_RATE};

/// Invoice as stored in a JSON input file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDocument {
    pub customer_name: String,
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
    #[serde(default)]
    pub items: Vec<DocumentItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentItem {
    pub name: String,
    pub unit_price: Decimal,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl From<DocumentItem> for LineItem {
    fn from(item: DocumentItem) -> Self {
        LineItem::new(item.name, item.unit_price).with_quantity(item.quantity)
    }
}

impl InvoiceDocument {
    /// Start a document with no items and the default tax rate.
    pub fn new(customer_name: impl Into<String>) -> Self {
        Self {
            customer_name: customer_name.into(),
            tax_rate: None,
            items: Vec::new(),
        }
    }

    /// Build the invoice. Negative tax rates are rejected here, the same
    /// rule `parse_rate` applies to text input.
    pub fn into_invoice(self) -> Result<Invoice, AppError> {
        let tax_rate = self.tax_rate.unwrap_or(DEFAULT_TAX_RATE);
        if tax_rate.is_sign_negative() && !tax_rate.is_zero() {
            return Err(AppError::InvalidTaxRate(format!(
                "'{}': must not be negative",
                tax_rate
            )));
        }

        let mut invoice = Invoice::new(self.customer_name).with_tax_rate(tax_rate);
        for item in self.items {
            invoice.add_line(item.into());
        }
        Ok(invoice)
    }
}

/// Read an invoice document from JSON
pub fn read_document<R: Read>(reader: R) -> Result<InvoiceDocument, AppError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Read a JSON document and build the invoice it describes
pub fn load_invoice_json<R: Read>(reader: R) -> Result<Invoice, AppError> {
    read_document(reader)?.into_invoice()
}

/// Result of an import operation
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub imported: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

/// Append line items from CSV rows of `name,unit_price[,quantity]`.
/// The first row is a header. Rows that fail to parse are reported and skipped.
pub fn import_items_csv<R: Read>(
    reader: R,
    invoice: &mut Invoice,
) -> Result<ImportResult, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    csv_reader.headers()?;

    let mut imported = 0;
    let mut errors = Vec::new();

    for (line_num, result) in csv_reader.records().enumerate() {
        let line = line_num + 2; // +2 for header and 0-indexing

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                errors.push(ImportError {
                    line,
                    field: None,
                    error: format!("CSV parse error: {}", e),
                });
                continue;
            }
        };

        let name = record.get(0).unwrap_or("");
        if name.is_empty() {
            errors.push(ImportError {
                line,
                field: Some("name".to_string()),
                error: "Missing item name".to_string(),
            });
            continue;
        }

        let unit_price = match parse_amount(record.get(1).unwrap_or("")) {
            Ok(price) => price,
            Err(e) => {
                errors.push(ImportError {
                    line,
                    field: Some("unit_price".to_string()),
                    error: format!("Invalid amount: {}", e),
                });
                continue;
            }
        };

        let quantity = match record.get(2).filter(|q| !q.is_empty()) {
            None => 1,
            Some(raw) => match parse_quantity(raw) {
                Ok(q) => q,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: Some("quantity".to_string()),
                        error: e.to_string(),
                    });
                    continue;
                }
            },
        };

        invoice.add_line(LineItem::new(name, unit_price).with_quantity(quantity));
        imported += 1;
    }

    Ok(ImportResult { imported, errors })
}
