use rust_decimal::Decimal;

use super::error::{self, Result};
use super::types::*;
use super::validation;

/// Builder for constructing valid invoices.
///
/// ```
/// use invoicer::core::*;
/// use rust_decimal_macros::dec;
///
/// let invoice = InvoiceBuilder::new("Acme Corp", "EUR")
///     .address("Via Roma 1", "00100 Roma")
///     .business_number("IT01234567890")
///     .date("15/06/2024")
///     .add_item(InvoiceItem::new("Consulting", dec!(2), dec!(100.0)))
///     .build()
///     .unwrap();
///
/// assert!(invoice.is_pending());
/// assert_eq!(invoice.total().unwrap(), dec!(200.0));
/// ```
pub struct InvoiceBuilder {
    customer: Customer,
    currency: String,
    date: Option<String>,
    number: Option<u64>,
    items: Vec<InvoiceItem>,
}

impl InvoiceBuilder {
    pub fn new(customer_name: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            customer: Customer {
                name: customer_name.into(),
                address_line1: String::new(),
                address_line2: String::new(),
                business_number: String::new(),
            },
            currency: currency.into(),
            date: None,
            number: None,
            items: Vec::new(),
        }
    }

    pub fn address(mut self, line1: impl Into<String>, line2: impl Into<String>) -> Self {
        self.customer.address_line1 = line1.into();
        self.customer.address_line2 = line2.into();
        self
    }

    pub fn business_number(mut self, number: impl Into<String>) -> Self {
        self.customer.business_number = number.into();
        self
    }

    /// Invoice date. Empty strings fall back to today.
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Explicit invoice number. Zero means "assign the next available".
    pub fn number(mut self, number: u64) -> Self {
        self.number = (number != 0).then_some(number);
        self
    }

    pub fn add_item(mut self, item: InvoiceItem) -> Self {
        self.items.push(item);
        self
    }

    /// Shorthand for `add_item(InvoiceItem::new(..))`.
    pub fn item(self, description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        self.add_item(InvoiceItem::new(description, quantity, unit_price))
    }

    /// Build the invoice and run validation.
    /// Returns all validation errors (not just the first).
    pub fn build(self) -> Result<Invoice> {
        let date = match self.date {
            Some(d) if !d.trim().is_empty() => d,
            _ => today(),
        };

        let invoice = Invoice {
            customer: self.customer,
            currency: self.currency,
            date,
            number: self.number,
            items: self.items,
        };

        error::check(validation::validate_invoice(&invoice))?;
        Ok(invoice)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::core::InvoicerError;

    #[test]
    fn zero_number_is_pending() {
        let inv = InvoiceBuilder::new("Acme", "EUR")
            .number(0)
            .item("Work", dec!(1), dec!(1))
            .build()
            .unwrap();
        assert!(inv.is_pending());
    }

    #[test]
    fn explicit_number_kept() {
        let inv = InvoiceBuilder::new("Acme", "EUR")
            .number(12)
            .item("Work", dec!(1), dec!(1))
            .build()
            .unwrap();
        assert_eq!(inv.number(), Some(12));
    }

    #[test]
    fn missing_date_defaults_to_today() {
        let inv = InvoiceBuilder::new("Acme", "EUR")
            .date("  ")
            .item("Work", dec!(1), dec!(1))
            .build()
            .unwrap();
        assert_eq!(inv.date(), today());
    }

    #[test]
    fn no_items_rejected() {
        let err = InvoiceBuilder::new("Acme", "EUR").build().unwrap_err();
        assert!(matches!(err, InvoicerError::Builder(msg) if msg.contains("invoice_items")));
    }

    #[test]
    fn customer_fields_set() {
        let inv = InvoiceBuilder::new("Acme", "chf")
            .address("Bahnhofstrasse 1", "8001 Zürich")
            .business_number("CHE-123.456.789")
            .item("Work", dec!(1), dec!(1))
            .build()
            .unwrap();
        assert_eq!(inv.customer().address_line2, "8001 Zürich");
        assert_eq!(inv.customer().business_number, "CHE-123.456.789");
        assert_eq!(inv.currency(), "chf");
    }
}
