//! Invoice templates: the YAML a user writes to describe one invoice.
//!
//! ```yaml
//! customer_name: Acme Corp
//! customer_address1: Main Street 1
//! customer_address2: 12345 Springfield
//! customer_business_number: VAT 0042
//! invoice_currency: EUR
//! invoice_number: 0          # optional; 0 or absent assigns the next number
//! invoice_date: 01/02/2024   # optional; defaults to today
//! invoice_items:
//!   - description: Consulting
//!     quantity: 2
//!     unit_price: 100.0
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::core::{Invoice, InvoiceBuilder, InvoiceItem, InvoicerError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

/// Raw template as written on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceTemplate {
    pub customer_name: String,
    pub customer_address1: String,
    pub customer_address2: String,
    pub customer_business_number: String,
    #[serde(default)]
    pub invoice_number: u64,
    pub invoice_currency: String,
    #[serde(default)]
    pub invoice_date: Option<String>,
    pub invoice_items: Vec<TemplateItem>,
    /// Accepted for compatibility, never trusted: totals are recomputed.
    #[serde(default)]
    pub invoice_total_price: Option<Decimal>,
}

impl InvoiceTemplate {
    pub fn into_invoice(self) -> Result<Invoice> {
        let mut builder = InvoiceBuilder::new(self.customer_name, self.invoice_currency)
            .address(self.customer_address1, self.customer_address2)
            .business_number(self.customer_business_number)
            .number(self.invoice_number);
        if let Some(date) = self.invoice_date {
            builder = builder.date(date);
        }
        for item in self.invoice_items {
            builder = builder.add_item(InvoiceItem::new(item.description, item.quantity, item.unit_price));
        }

        let invoice = builder.build().map_err(|e| match e {
            InvoicerError::Builder(msg) => InvoicerError::TemplateInvalid(msg),
            other => other,
        })?;

        if let Some(stated) = self.invoice_total_price {
            let computed = invoice.total()?;
            if !stated.is_zero() && stated != computed {
                tracing::warn!(%stated, %computed, "ignoring stale invoice_total_price");
            }
        }
        Ok(invoice)
    }
}

/// Parse a template from YAML text.
pub fn parse_template(yaml: &str) -> Result<Invoice> {
    let template: InvoiceTemplate =
        serde_yaml::from_str(yaml).map_err(|e| InvoicerError::TemplateInvalid(e.to_string()))?;
    template.into_invoice()
}

/// Read and parse the template at `path`.
pub fn read_template(path: &Path) -> Result<Invoice> {
    if !path.exists() {
        return Err(InvoicerError::TemplateNotFound(path.to_path_buf()));
    }
    let yaml = std::fs::read_to_string(path)?;
    let invoice = parse_template(&yaml)?;
    tracing::debug!(path = %path.display(), items = invoice.items().len(), "read template");
    Ok(invoice)
}
