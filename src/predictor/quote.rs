//! Annual estimate broken down into shorter periods.

use serde::Serialize;
use std::fmt;

/// An annual cost and its monthly, weekly and daily equivalents.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub annual: f64,
    pub monthly: f64,
    pub weekly: f64,
    pub daily: f64,
}

impl CostBreakdown {
    pub fn from_annual(annual: f64) -> Self {
        Self {
            annual,
            monthly: annual / 12.0,
            weekly: annual / 52.0,
            daily: annual / 365.0,
        }
    }

    /// `(label, formatted amount)` rows, annual first.
    pub fn rows(&self) -> [(&'static str, String); 4] {
        [
            ("Annual", format_usd(self.annual)),
            ("Monthly", format_usd(self.monthly)),
            ("Weekly", format_usd(self.weekly)),
            ("Daily", format_usd(self.daily)),
        ]
    }
}

impl fmt::Display for CostBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Estimated annual cost: {}", format_usd(self.annual))?;
        writeln!(f, "  Monthly: {}", format_usd(self.monthly))?;
        writeln!(f, "  Weekly:  {}", format_usd(self.weekly))?;
        write!(f, "  Daily:   {}", format_usd(self.daily))
    }
}

/// Dollar amount with thousands separators and two decimals, e.g. `$1,234.57`.
pub fn format_usd(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac:02}")
}
