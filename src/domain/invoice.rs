use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{format_currency, format_percentage, Calculator};

/// Tax rate applied when none is given: 8%.
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Width of the separator rule in the text summary.
pub const SEPARATOR_WIDTH: usize = 40;

/// One purchasable entry on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl LineItem {
    /// Create a line item with a quantity of one.
    pub fn new(name: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            name: name.into(),
            unit_price,
            quantity: 1,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }
}

/// An invoice for a single customer.
/// Items are append-only and keep their insertion order; every derived
/// amount is recomputed on demand through the owned [`Calculator`].
#[derive(Debug, Clone)]
pub struct Invoice {
    customer_name: String,
    tax_rate: Decimal,
    items: Vec<LineItem>,
    calc: Calculator,
}

impl Invoice {
    pub fn new(customer_name: impl Into<String>) -> Self {
        Self {
            customer_name: customer_name.into(),
            tax_rate: DEFAULT_TAX_RATE,
            items: Vec::new(),
            calc: Calculator::default(),
        }
    }

    pub fn with_tax_rate(mut self, tax_rate: Decimal) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calc
    }

    /// Append an item. Prices and quantities are taken as-is.
    pub fn add_item(&mut self, name: impl Into<String>, unit_price: Decimal, quantity: u32) {
        self.add_line(LineItem::new(name, unit_price).with_quantity(quantity));
    }

    pub fn add_line(&mut self, item: LineItem) {
        tracing::debug!(
            customer = %self.customer_name,
            item = %item.name,
            unit_price = %item.unit_price,
            quantity = item.quantity,
            "line item added"
        );
        self.items.push(item);
    }

    /// Price times quantity for a single item, rounded by the calculator.
    pub fn line_total(&self, item: &LineItem) -> Decimal {
        self.calc.multiply(item.unit_price, Decimal::from(item.quantity))
    }

    /// Sum of line totals. Rounds after every step of the fold, not only at the end.
    pub fn calculate_subtotal(&self) -> Decimal {
        self.items.iter().fold(Decimal::ZERO, |total, item| {
            self.calc.add(total, self.line_total(item))
        })
    }

    pub fn calculate_tax(&self) -> Decimal {
        self.calc.multiply(self.calculate_subtotal(), self.tax_rate)
    }

    pub fn calculate_total(&self) -> Decimal {
        self.calc.add(self.calculate_subtotal(), self.calculate_tax())
    }

    /// Render the fixed-layout text summary. Lines are joined with `\n`
    /// and there is no trailing newline.
    pub fn generate_summary(&self) -> String {
        let subtotal = self.calculate_subtotal();
        let tax = self.calculate_tax();
        let total = self.calculate_total();
        let rule = "-".repeat(SEPARATOR_WIDTH);

        let mut lines = Vec::with_capacity(self.items.len() + 6);
        lines.push(format!("Invoice for: {}", self.customer_name));
        lines.push(rule.clone());

        for item in &self.items {
            lines.push(format!(
                "  {} x{}: {}",
                item.name,
                item.quantity,
                format_currency(self.line_total(item))
            ));
        }

        lines.push(rule);
        lines.push(format!("Subtotal: {}", format_currency(subtotal)));
        lines.push(format!(
            "Tax ({}): {}",
            format_percentage(self.tax_rate),
            format_currency(tax)
        ));
        lines.push(format!("Total: {}", format_currency(total)));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_invoice() -> Invoice {
        let mut invoice = Invoice::new("Acme Corp");
        invoice.add_item("A", dec!(10.00), 2);
        invoice.add_item("B", dec!(5.00), 3);
        invoice
    }

    #[test]
    fn test_default_tax_rate() {
        let invoice = Invoice::new("Acme Corp");
        assert_eq!(invoice.tax_rate(), dec!(0.08));
        assert_eq!(invoice.calculator().precision(), 2);
    }

    #[test]
    fn test_line_item_defaults_to_single_quantity() {
        let item = LineItem::new("Widget", dec!(3.50));
        assert_eq!(item.quantity, 1);
        assert_eq!(item.with_quantity(4).quantity, 4);
    }

    #[test]
    fn test_totals() {
        let invoice = sample_invoice();
        assert_eq!(invoice.calculate_subtotal(), dec!(35.00));
        assert_eq!(invoice.calculate_tax(), dec!(2.80));
        assert_eq!(invoice.calculate_total(), dec!(37.80));
    }

    #[test]
    fn test_empty_invoice_is_zero() {
        let invoice = Invoice::new("Nobody");
        assert_eq!(invoice.calculate_subtotal(), Decimal::ZERO);
        assert_eq!(invoice.calculate_tax(), Decimal::ZERO);
        assert_eq!(invoice.calculate_total(), Decimal::ZERO);
    }

    #[test]
    fn test_subtotal_rounds_each_step() {
        // Rounding only at the end would give 0.01.
        let mut invoice = Invoice::new("Rounding");
        invoice.add_item("half cent", dec!(0.005), 1);
        invoice.add_item("half cent", dec!(0.005), 1);
        assert_eq!(invoice.calculate_subtotal(), dec!(0.00));
    }

    #[test]
    fn test_negative_price_is_accepted() {
        let mut invoice = Invoice::new("Refund");
        invoice.add_item("Widget", dec!(20.00), 1);
        invoice.add_item("Discount", dec!(-5.00), 1);
        assert_eq!(invoice.calculate_subtotal(), dec!(15.00));
        assert_eq!(invoice.items().len(), 2);
    }

    #[test]
    fn test_amounts_beyond_decimal_range_saturate() {
        let mut invoice = Invoice::new("Big");
        invoice.add_item("X", Decimal::MAX, 2);
        invoice.add_item("Y", dec!(1.00), 1);

        assert_eq!(invoice.line_total(&invoice.items()[0]), Decimal::MAX);
        assert_eq!(invoice.calculate_subtotal(), Decimal::MAX);
        assert_eq!(invoice.calculate_total(), Decimal::MAX);
        let summary = invoice.generate_summary();
        assert!(summary.starts_with("Invoice for: Big"));
        assert!(summary.contains("  X x2: $79,228,162,514,264,337,593,543,950,335.00"));
    }

    #[test]
    fn test_custom_tax_rate() {
        let mut invoice = Invoice::new("Acme Corp").with_tax_rate(dec!(0.10));
        invoice.add_item("Service", dec!(99.99), 1);
        assert_eq!(invoice.calculate_tax(), dec!(10.00));
        assert_eq!(invoice.calculate_total(), dec!(109.99));
    }

    #[test]
    fn test_generate_summary_layout() {
        let invoice = sample_invoice();
        let expected = [
            "Invoice for: Acme Corp",
            "----------------------------------------",
            "  A x2: $20.00",
            "  B x3: $15.00",
            "----------------------------------------",
            "Subtotal: $35.00",
            "Tax (8.00%): $2.80",
            "Total: $37.80",
        ]
        .join("\n");
        assert_eq!(invoice.generate_summary(), expected);
    }

    #[test]
    fn test_generate_summary_without_items() {
        let summary = Invoice::new("Empty").generate_summary();
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], lines[2]);
        assert_eq!(lines[3], "Subtotal: $0.00");
    }
}
