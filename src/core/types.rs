use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::{InvoicerError, Result};

/// Date format used when an invoice carries no explicit date (day/month/year).
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Today's local date in [`DATE_FORMAT`].
pub fn today() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}

/// The invoiced party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer name; also used to name the output artifact.
    pub name: String,
    /// First address line (street).
    pub address_line1: String,
    /// Second address line (postal code, city).
    pub address_line2: String,
    /// VAT or business registration number.
    pub business_number: String,
}

/// One invoiced line. Fields are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    description: String,
    quantity: Decimal,
    unit_price: Decimal,
}

impl InvoiceItem {
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// `quantity * unit_price`, exact.
    pub fn line_total(&self) -> Result<Decimal> {
        self.quantity.checked_mul(self.unit_price).ok_or_else(|| {
            InvoicerError::Arithmetic(format!(
                "{} x {} overflows the line total of '{}'",
                self.quantity, self.unit_price, self.description
            ))
        })
    }
}

/// An invoice, either pending numbering or carrying its final number.
///
/// Built through [`InvoiceBuilder`](super::InvoiceBuilder), which validates it;
/// there is no other way in, deserialization included. The total is never
/// stored; [`Invoice::total`] always sums the current items.
///
/// ```compile_fail
/// fn deserializable<T: serde::de::DeserializeOwned>() {}
/// deserializable::<invoicer::core::Invoice>();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invoice {
    pub(crate) customer: Customer,
    pub(crate) currency: String,
    pub(crate) date: String,
    pub(crate) number: Option<u64>,
    pub(crate) items: Vec<InvoiceItem>,
}

impl Invoice {
    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    /// Currency code as written in the template (case preserved).
    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    /// The resolved number, or `None` while numbering is pending.
    pub fn number(&self) -> Option<u64> {
        self.number
    }

    pub fn is_pending(&self) -> bool {
        self.number.is_none()
    }

    pub fn items(&self) -> &[InvoiceItem] {
        &self.items
    }

    /// Sum of all line totals.
    pub fn total(&self) -> Result<Decimal> {
        self.items.iter().try_fold(Decimal::ZERO, |sum, item| {
            sum.checked_add(item.line_total()?)
                .ok_or_else(|| InvoicerError::Arithmetic("invoice total overflows".into()))
        })
    }

    /// Give a pending invoice its number.
    ///
    /// Re-assigning the number it already carries is a no-op; any other
    /// number is refused. Zero is not a valid invoice number.
    pub fn assign_number(&mut self, number: u64) -> Result<()> {
        if number == 0 {
            return Err(InvoicerError::Builder(
                "invoice number must be greater than zero".into(),
            ));
        }
        match self.number {
            None => {
                self.number = Some(number);
                Ok(())
            }
            Some(assigned) if assigned == number => Ok(()),
            Some(assigned) => Err(InvoicerError::NumberAlreadyAssigned {
                assigned,
                requested: number,
            }),
        }
    }
}
