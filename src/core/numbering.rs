use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{InvoicerError, Result};
use super::types::Invoice;

/// Separator between the invoice number and the rest of an artifact name.
pub const SEPARATOR: char = '_';

/// Extension of issued invoice artifacts.
pub const ARTIFACT_EXTENSION: &str = "pdf";

/// Extension of reservation sentinels, see [`DirectoryLedger::reserve`].
pub const RESERVATION_EXTENSION: &str = "reserved";

/// How an explicitly requested number is checked against existing file names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateMatch {
    /// The leading token (up to the first `_`) must parse to the same number.
    #[default]
    ExactToken,
    /// Any file whose name starts with the decimal number collides, so `1`
    /// is rejected by `10_acme.pdf`. Kept for compatibility with ledgers
    /// produced under the old rule.
    LegacyPrefix,
}

/// The invoice number encoded at the start of `file_name`, if any.
///
/// The leading token is everything before the first [`SEPARATOR`] and must
/// consist of ASCII digits only.
pub fn leading_number(file_name: &str) -> Option<u64> {
    let token = file_name.split(SEPARATOR).next()?;
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Source of truth for which invoice numbers have been issued.
pub trait NumberLedger {
    /// Every number counted as issued, in no particular order.
    fn issued_numbers(&self) -> Result<Vec<u64>>;

    /// Whether `number` collides with an existing entry.
    fn is_taken(&self, number: u64) -> Result<bool>;

    /// One past the highest issued number; 1 for an empty ledger.
    fn next_available(&self) -> Result<u64> {
        let max = self.issued_numbers()?.into_iter().max().unwrap_or(0);
        max.checked_add(1)
            .ok_or_else(|| InvoicerError::Configuration("invoice number space exhausted".into()))
    }
}

/// Turn a possibly-absent requested number into a definite, collision-checked one.
///
/// `None` and `Some(0)` yield [`NumberLedger::next_available`]. A non-zero
/// request is returned unchanged unless the ledger already holds it.
pub fn resolve_with<L: NumberLedger + ?Sized>(requested: Option<u64>, ledger: &L) -> Result<u64> {
    match requested.filter(|&n| n != 0) {
        Some(number) => {
            if ledger.is_taken(number)? {
                return Err(InvoicerError::DuplicateInvoiceNumber(number));
            }
            tracing::info!(number, "requested invoice number is free");
            Ok(number)
        }
        None => {
            let number = ledger.next_available()?;
            tracing::info!(number, "assigned next invoice number");
            Ok(number)
        }
    }
}

/// [`resolve_with`] against the artifacts in `ledger_dir`, using default
/// matching rules.
pub fn resolve(requested: Option<u64>, ledger_dir: &Path) -> Result<u64> {
    resolve_with(requested, &DirectoryLedger::new(ledger_dir))
}

/// Resolve the number of `invoice` and assign it.
pub fn resolve_invoice<L: NumberLedger + ?Sized>(invoice: &mut Invoice, ledger: &L) -> Result<u64> {
    let number = resolve_with(invoice.number(), ledger)?;
    invoice.assign_number(number)?;
    Ok(number)
}

/// Ledger backed by the file names in an output directory.
///
/// The directory is re-scanned on every call; nothing is cached.
#[derive(Debug, Clone)]
pub struct DirectoryLedger {
    dir: PathBuf,
    extension: String,
    duplicate_match: DuplicateMatch,
}

impl DirectoryLedger {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: ARTIFACT_EXTENSION.to_string(),
            duplicate_match: DuplicateMatch::default(),
        }
    }

    /// Set the artifact extension counted by [`NumberLedger::next_available`] (default: `pdf`).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_duplicate_match(mut self, mode: DuplicateMatch) -> Self {
        self.duplicate_match = mode;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn duplicate_match(&self) -> DuplicateMatch {
        self.duplicate_match
    }

    fn file_names(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| match e.kind() {
            ErrorKind::NotFound => InvoicerError::Configuration(format!(
                "output directory {} does not exist",
                self.dir.display()
            )),
            _ => InvoicerError::Io(e),
        })?;

        let mut names = Vec::new();
        for entry in entries {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn is_issued_artifact(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.extension || ext == RESERVATION_EXTENSION)
    }

    /// Claim `number` by atomically creating `{number}_.reserved`.
    ///
    /// Fails with [`InvoicerError::DuplicateInvoiceNumber`] when another run
    /// holds the same reservation. The sentinel is removed when the returned
    /// guard is dropped.
    pub fn reserve(&self, number: u64) -> Result<Reservation> {
        let path = self
            .dir
            .join(format!("{number}{SEPARATOR}.{RESERVATION_EXTENSION}"));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {
                tracing::debug!(number, path = %path.display(), "reserved invoice number");
                Ok(Reservation { path, number })
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(InvoicerError::DuplicateInvoiceNumber(number))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(InvoicerError::Configuration(
                format!("output directory {} does not exist", self.dir.display()),
            )),
            Err(e) => Err(e.into()),
        }
    }
}

impl NumberLedger for DirectoryLedger {
    fn issued_numbers(&self) -> Result<Vec<u64>> {
        let mut numbers = Vec::new();
        for name in self.file_names()? {
            if !self.is_issued_artifact(&name) {
                continue;
            }
            if let Some(number) = leading_number(&name) {
                tracing::debug!(file = %name, number, "found issued invoice");
                numbers.push(number);
            }
        }
        Ok(numbers)
    }

    fn is_taken(&self, number: u64) -> Result<bool> {
        let wanted = number.to_string();
        let taken = self.file_names()?.iter().any(|name| match self.duplicate_match {
            DuplicateMatch::ExactToken => leading_number(name) == Some(number),
            DuplicateMatch::LegacyPrefix => name.starts_with(&wanted),
        });
        Ok(taken)
    }
}

/// A claimed invoice number. Dropping the guard removes the sentinel file.
#[derive(Debug)]
pub struct Reservation {
    path: PathBuf,
    number: u64,
}

impl Reservation {
    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove reservation");
        }
    }
}

/// In-memory ledger, for tests and for embedding behind another store.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    numbers: BTreeSet<u64>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `number` as issued. Returns false if it already was.
    pub fn insert(&mut self, number: u64) -> bool {
        self.numbers.insert(number)
    }
}

impl FromIterator<u64> for MemoryLedger {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self {
            numbers: iter.into_iter().collect(),
        }
    }
}

impl NumberLedger for MemoryLedger {
    fn issued_numbers(&self) -> Result<Vec<u64>> {
        Ok(self.numbers.iter().copied().collect())
    }

    fn is_taken(&self, number: u64) -> Result<bool> {
        Ok(self.numbers.contains(&number))
    }
}
