use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::{AppError, ReportFormat};
use crate::domain::Invoice;

/// Machine-readable snapshot of an invoice and its derived amounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceReport {
    pub customer_name: String,
    pub tax_rate: Decimal,
    pub lines: Vec<ReportLine>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl InvoiceReport {
    pub fn from_invoice(invoice: &Invoice) -> Self {
        let lines = invoice
            .items()
            .iter()
            .map(|item| ReportLine {
                name: item.name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                line_total: invoice.line_total(item),
            })
            .collect();

        Self {
            customer_name: invoice.customer_name().to_string(),
            tax_rate: invoice.tax_rate(),
            lines,
            subtotal: invoice.calculate_subtotal(),
            tax: invoice.calculate_tax(),
            total: invoice.calculate_total(),
            generated_at: Utc::now(),
        }
    }
}

/// Exporter for converting an invoice to various formats
pub struct Exporter<'a> {
    invoice: &'a Invoice,
}

impl<'a> Exporter<'a> {
    pub fn new(invoice: &'a Invoice) -> Self {
        Self { invoice }
    }

    /// Export the full report as pretty-printed JSON
    pub fn export_report_json<W: Write>(&self, mut writer: W) -> Result<InvoiceReport, AppError> {
        let report = InvoiceReport::from_invoice(self.invoice);

        let json = serde_json::to_string_pretty(&report)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(report)
    }

    /// Export line items to CSV format
    pub fn export_lines_csv<W: Write>(&self, writer: W) -> Result<usize, AppError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["name", "quantity", "unit_price", "line_total"])?;

        let mut count = 0;
        for item in self.invoice.items() {
            csv_writer.write_record(&[
                item.name.clone(),
                item.quantity.to_string(),
                item.unit_price.to_string(),
                self.invoice.line_total(item).to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Render the invoice in the requested format
    pub fn render(&self, format: ReportFormat) -> Result<String, AppError> {
        match format {
            ReportFormat::Text => Ok(self.invoice.generate_summary()),
            ReportFormat::Json => {
                let report = InvoiceReport::from_invoice(self.invoice);
                Ok(serde_json::to_string_pretty(&report)?)
            }
            ReportFormat::Csv => {
                let mut buf = Vec::new();
                self.export_lines_csv(&mut buf)?;
                Ok(String::from_utf8_lossy(&buf).trim_end().to_string())
            }
        }
    }
}
