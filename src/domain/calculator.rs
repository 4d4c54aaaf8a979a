use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places used for invoice arithmetic.
pub const DEFAULT_PRECISION: u32 = 2;

/// Fixed-precision arithmetic helper.
/// Every result is rounded to `precision` decimal places, half to even.
/// Results beyond the `Decimal` range saturate at `Decimal::MAX` / `Decimal::MIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calculator {
    precision: u32,
}

impl Calculator {
    pub fn new(precision: u32) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn add(&self, a: Decimal, b: Decimal) -> Decimal {
        self.round(a.saturating_add(b))
    }

    pub fn multiply(&self, a: Decimal, b: Decimal) -> Decimal {
        self.round(a.saturating_mul(b))
    }

    fn round(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.precision, RoundingStrategy::MidpointNearestEven)
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(DEFAULT_PRECISION)
    }
}
