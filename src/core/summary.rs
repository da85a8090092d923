use std::fmt;

use rust_decimal::Decimal;

use super::error::Result;
use super::format::NumberFormat;
use super::types::Invoice;

const RULE: &str = "-------";

/// Plain-text overview of an invoice, printed before the artifact is written.
///
/// Totals are computed up front, so an invoice whose amounts overflow is
/// refused by [`InvoiceSummary::new`] instead of failing while printing.
///
/// ```
/// use invoicer::core::*;
/// use rust_decimal_macros::dec;
///
/// let invoice = InvoiceBuilder::new("Acme Corp", "EUR")
///     .date("01/02/2024")
///     .item("Consulting", dec!(2), dec!(100))
///     .build()
///     .unwrap();
/// let text = InvoiceSummary::new(&invoice, NumberFormat::Shortest).unwrap().to_string();
/// assert!(text.contains("Invoice Total Price: 200.0"));
/// ```
pub struct InvoiceSummary<'a> {
    invoice: &'a Invoice,
    format: NumberFormat,
    line_totals: Vec<Decimal>,
    total: Decimal,
}

impl<'a> InvoiceSummary<'a> {
    pub fn new(invoice: &'a Invoice, format: NumberFormat) -> Result<Self> {
        let line_totals = invoice
            .items()
            .iter()
            .map(|item| item.line_total())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            invoice,
            format,
            line_totals,
            total: invoice.total()?,
        })
    }
}

impl fmt::Display for InvoiceSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inv = self.invoice;
        let customer = inv.customer();
        let num = |v| self.format.format(v);

        writeln!(f, "Invoice")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Customer Name: {}", customer.name)?;
        writeln!(f, "Customer Address1: {}", customer.address_line1)?;
        writeln!(f, "Customer Address2: {}", customer.address_line2)?;
        writeln!(f, "Customer Business Number: {}", customer.business_number)?;
        match inv.number() {
            Some(n) => writeln!(f, "Invoice Number: {n}")?,
            None => writeln!(f, "Invoice Number: (pending)")?,
        }
        writeln!(f, "Invoice Currency: {}", inv.currency())?;
        writeln!(f, "Invoice Date: {}", inv.date())?;
        writeln!(f, "Invoice Items:")?;
        for (item, line_total) in inv.items().iter().zip(&self.line_totals) {
            writeln!(f, "\tDescription: {}", item.description())?;
            writeln!(f, "\tQuantity: {}", num(item.quantity()))?;
            writeln!(f, "\tUnit Price: {}", num(item.unit_price()))?;
            writeln!(f, "\tTotal Price: {}", num(*line_total))?;
        }
        writeln!(f, "Invoice Total Price: {}", num(self.total))?;
        write!(f, "{RULE}")
    }
}
