use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while numbering, composing or writing an invoice.
///
/// Every variant is terminal for a run: nothing is retried and no partial
/// artifact is left behind.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvoicerError {
    /// Settings failed validation, or the output directory does not exist.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The invoice template path does not exist.
    #[error("template file {} does not exist", .0.display())]
    TemplateNotFound(PathBuf),

    /// The invoice template could not be parsed into an invoice.
    #[error("invalid template: {0}")]
    TemplateInvalid(String),

    /// The requested invoice number is already present in the ledger.
    #[error("file with invoice number {0} already exists")]
    DuplicateInvoiceNumber(u64),

    /// No payment instructions are configured for the invoice currency.
    #[error("no payment instructions for currency '{0}'")]
    UnknownCurrency(String),

    /// The invoice is still waiting for a number.
    #[error("invoice number has not been resolved")]
    UnresolvedNumber,

    /// An assigned invoice number cannot be changed.
    #[error("invoice already carries number {assigned}, refusing to reassign {requested}")]
    NumberAlreadyAssigned { assigned: u64, requested: u64 },

    /// An amount does not fit the decimal range.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// Invoice construction rejected its input.
    #[error("builder error: {0}")]
    Builder(String),

    /// The target artifact file is already on disk.
    #[error("artifact {} already exists", .0.display())]
    ArtifactExists(PathBuf),

    /// The rendering collaborator failed to produce the document.
    #[error("render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = InvoicerError> = std::result::Result<T, E>;

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "invoice_items.0.description").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Join validation errors into one `Builder` error, or `Ok(())` when empty.
pub(crate) fn check(errors: Vec<ValidationError>) -> Result<()> {
    if errors.is_empty() {
        return Ok(());
    }
    let joined = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    Err(InvoicerError::Builder(joined))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_message_names_number() {
        let err = InvoicerError::DuplicateInvoiceNumber(5);
        assert_eq!(err.to_string(), "file with invoice number 5 already exists");
    }

    #[test]
    fn check_joins_all_errors() {
        let err = check(vec![
            ValidationError::new("customer_name", "must not be empty"),
            ValidationError::new("invoice_items", "at least one item is required"),
        ])
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "builder error: customer_name: must not be empty; invoice_items: at least one item is required"
        );
    }

    #[test]
    fn check_passes_empty() {
        assert!(check(Vec::new()).is_ok());
    }
}
