//! Settings file: where invoices go and what surrounds every invoice.
//!
//! ```yaml
//! output_directory: ~/invoices
//! invoice_header: ["ACME Srl", "Via Roma 1"]
//! invoice_footer: ["Thank you for your business"]
//! payment_instructions:
//!   eur: "IBAN IT00 0000 0000 0000 0000 00"
//! number_format: { fixed: 2 }  # optional, default: shortest exact form
//! duplicate_match: exact_token
//! ```

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{
    DirectoryLedger, DuplicateMatch, InvoicerError, LayoutConfig, NumberFormat, Result,
};

/// Environment variable overriding the settings file location.
pub const SETTINGS_ENV: &str = "INVOICER_CONFIG";

/// Settings file location relative to the home directory.
pub const SETTINGS_FILE: &str = ".config/invoicer.yml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Directory receiving artifacts; also the ledger of issued numbers.
    pub output_directory: PathBuf,
    #[serde(default)]
    pub invoice_header: Vec<String>,
    #[serde(default)]
    pub invoice_footer: Vec<String>,
    /// Payment instruction text keyed by currency code.
    #[serde(default)]
    pub payment_instructions: BTreeMap<String, String>,
    #[serde(default)]
    pub number_format: NumberFormatSettings,
    #[serde(default)]
    pub duplicate_match: DuplicateMatch,
    #[cfg(feature = "pdf")]
    #[serde(default)]
    pub page_size: crate::pdf::PageSize,
}

/// `number_format` section. Without `fixed` amounts print their exact value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumberFormatSettings {
    /// Round every amount to this many decimal places.
    #[serde(default)]
    pub fixed: Option<u32>,
}

impl Settings {
    /// `~/.config/invoicer.yml`, if a home directory can be determined.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(SETTINGS_FILE))
    }

    /// Parse settings without touching the filesystem.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let mut settings: Self = serde_yaml::from_str(yaml)
            .map_err(|e| InvoicerError::Configuration(format!("invalid settings: {e}")))?;
        settings.output_directory = expand_home(&settings.output_directory);
        Ok(settings)
    }

    /// Read, parse and validate the settings file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => InvoicerError::Configuration(format!(
                "settings file {} does not exist",
                path.display()
            )),
            _ => InvoicerError::Io(e),
        })?;
        let settings = Self::from_yaml(&yaml)?;
        settings.validate()?;
        tracing::debug!(
            path = %path.display(),
            output_directory = %settings.output_directory.display(),
            "loaded settings"
        );
        Ok(settings)
    }

    /// Fail fast on settings that cannot produce an invoice.
    pub fn validate(&self) -> Result<()> {
        if !self.output_directory.is_dir() {
            return Err(InvoicerError::Configuration(format!(
                "output directory {} does not exist",
                self.output_directory.display()
            )));
        }
        if let Some(key) = self.payment_instructions.keys().find(|k| k.trim().is_empty()) {
            return Err(InvoicerError::Configuration(format!(
                "payment instruction key '{key}' is not a currency code"
            )));
        }
        Ok(())
    }

    pub fn number_format(&self) -> NumberFormat {
        self.number_format
            .fixed
            .map_or(NumberFormat::Shortest, NumberFormat::Fixed)
    }

    pub fn layout(&self) -> LayoutConfig {
        let mut layout = LayoutConfig::new().number_format(self.number_format());
        for line in &self.invoice_header {
            layout = layout.header_line(line.as_str());
        }
        for line in &self.invoice_footer {
            layout = layout.footer_line(line.as_str());
        }
        for (currency, instruction) in &self.payment_instructions {
            layout = layout.payment_instruction(currency, instruction.as_str());
        }
        layout
    }

    pub fn ledger(&self) -> DirectoryLedger {
        DirectoryLedger::new(&self.output_directory).with_duplicate_match(self.duplicate_match)
    }

    #[cfg(feature = "pdf")]
    pub fn renderer(&self) -> crate::pdf::PdfRenderer {
        crate::pdf::PdfRenderer::new().page_size(self.page_size)
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_settings() {
        let settings = Settings::from_yaml("output_directory: /tmp\n").unwrap();
        assert_eq!(settings.output_directory, PathBuf::from("/tmp"));
        assert!(settings.invoice_header.is_empty());
        assert_eq!(settings.duplicate_match, DuplicateMatch::ExactToken);
        assert_eq!(settings.number_format(), NumberFormat::Shortest);
    }

    #[test]
    fn full_settings_to_layout() {
        let yaml = r#"
output_directory: /tmp
invoice_header: ["ACME Srl", "Via Roma 1"]
invoice_footer: ["Thanks"]
payment_instructions:
  EUR: "IBAN IT00"
number_format: { fixed: 2 }
duplicate_match: legacy_prefix
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        let layout = settings.layout();
        assert_eq!(layout.header_lines(), ["ACME Srl", "Via Roma 1"]);
        assert_eq!(layout.instruction_for("eur"), Some("IBAN IT00"));
        assert_eq!(layout.format(), NumberFormat::Fixed(2));
        assert_eq!(settings.ledger().duplicate_match(), DuplicateMatch::LegacyPrefix);
    }

    #[test]
    fn documented_settings_example() {
        let yaml = r#"
output_directory: /home/me/invoices
invoice_header: [ "ACME Srl", "Via Roma 1" ]
invoice_footer: [ "Thank you" ]
payment_instructions:
  eur: "IBAN IT00 0000 0000 0000 0000 00"
  chf: "IBAN CH00 0000 0000 0000 0000 0"
number_format: { fixed: 2 }     # optional, default shortest
duplicate_match: exact_token    # optional, or legacy_prefix
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.number_format(), NumberFormat::Fixed(2));
        assert_eq!(settings.duplicate_match, DuplicateMatch::ExactToken);
        assert_eq!(settings.layout().instruction_for("CHF"), Some("IBAN CH00 0000 0000 0000 0000 0"));
    }

    #[test]
    fn empty_number_format_is_shortest() {
        let settings = Settings::from_yaml("output_directory: /tmp
number_format: {}
").unwrap();
        assert_eq!(settings.number_format(), NumberFormat::Shortest);
        assert!(Settings::from_yaml("output_directory: /tmp
number_format: { places: 2 }
").is_err());
    }

    #[test]
    fn missing_output_directory_key() {
        let err = Settings::from_yaml("invoice_header: []\n").unwrap_err();
        assert!(matches!(err, InvoicerError::Configuration(_)));
    }

    #[test]
    fn unknown_key_rejected() {
        let err = Settings::from_yaml("output_directory: /tmp\ncolour: red\n").unwrap_err();
        assert!(matches!(err, InvoicerError::Configuration(_)));
    }

    #[test]
    fn nonexistent_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let settings_path = dir.path().join("invoicer.yml");
        let yaml = format!("output_directory: {}\n", dir.path().join("missing").display());
        std::fs::write(&settings_path, yaml).unwrap();
        let err = Settings::load(&settings_path).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn missing_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(&dir.path().join("nope.yml")).unwrap_err();
        assert!(matches!(err, InvoicerError::Configuration(_)));
    }

    #[test]
    fn tilde_expanded() {
        let settings = Settings::from_yaml("output_directory: ~/invoices\n").unwrap();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(settings.output_directory, home.join("invoices"));
        }
    }
}
