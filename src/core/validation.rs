use super::error::ValidationError;
use super::types::*;

/// Upper bound on line items per invoice.
pub const MAX_ITEMS: usize = 10_000;

/// Validate the shape of an invoice before it is numbered or rendered.
/// Returns all validation errors found (not just the first).
///
/// Field paths use the template key names so that errors point back at the
/// YAML the user wrote.
pub fn validate_invoice(invoice: &Invoice) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if invoice.customer.name.trim().is_empty() {
        errors.push(ValidationError::new(
            "customer_name",
            "customer name must not be empty",
        ));
    }

    // The currency is a lookup key and part of the printed total row.
    let currency = invoice.currency.trim();
    if currency.is_empty() {
        errors.push(ValidationError::new(
            "invoice_currency",
            "currency must not be empty",
        ));
    } else if currency.chars().any(char::is_whitespace) {
        errors.push(ValidationError::new(
            "invoice_currency",
            format!("currency '{}' must not contain whitespace", invoice.currency),
        ));
    }

    if invoice.items.is_empty() {
        errors.push(ValidationError::new(
            "invoice_items",
            "at least one item is required",
        ));
    } else if invoice.items.len() > MAX_ITEMS {
        errors.push(ValidationError::new(
            "invoice_items",
            format!("invoice cannot have more than {MAX_ITEMS} items"),
        ));
    }

    let mut lines_fit = true;
    for (i, item) in invoice.items.iter().enumerate() {
        if item.description().trim().is_empty() {
            errors.push(ValidationError::new(
                format!("invoice_items.{i}.description"),
                "description must not be empty",
            ));
        }
        if item.line_total().is_err() {
            lines_fit = false;
            errors.push(ValidationError::new(
                format!("invoice_items.{i}"),
                format!(
                    "quantity {} times unit price {} is out of range",
                    item.quantity(),
                    item.unit_price()
                ),
            ));
        }
    }
    if lines_fit && invoice.total().is_err() {
        errors.push(ValidationError::new(
            "invoice_items",
            "invoice total is out of range",
        ));
    }

    errors
}
