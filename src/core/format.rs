//! Rendering of quantities and amounts as text.

use rust_decimal::{Decimal, RoundingStrategy};

/// How decimals are turned into text on the document and in the summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumberFormat {
    /// Exact value, trailing zeros trimmed, at least one fractional digit:
    /// `200` ⇒ `200.0`, `12.50` ⇒ `12.5`, `0.125` ⇒ `0.125`.
    #[default]
    Shortest,
    /// Rounded half away from zero to exactly this many places.
    Fixed(u32),
}

impl NumberFormat {
    pub fn format(&self, value: Decimal) -> String {
        match *self {
            Self::Shortest => {
                let value = value.normalize();
                if value.scale() == 0 {
                    format!("{value}.0")
                } else {
                    value.to_string()
                }
            }
            Self::Fixed(places) => {
                let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
                format!("{rounded:.prec$}", prec = places as usize)
            }
        }
    }
}
