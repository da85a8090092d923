//! # invoicer
//!
//! Turns a declarative invoice description into a sequentially numbered,
//! collision-checked invoice and a fixed-layout printable document.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! The output directory doubles as the ledger of issued numbers: an artifact
//! named `7_acme.pdf` means invoice 7 has been issued.
//!
//! ## Quick Start
//!
//! ```rust
//! use invoicer::core::*;
//! use rust_decimal_macros::dec;
//!
//! let mut invoice = InvoiceBuilder::new("Acme Corp", "EUR")
//!     .date("15/06/2024")
//!     .item("Consulting", dec!(2), dec!(100.0))
//!     .build()
//!     .unwrap();
//!
//! let ledger: MemoryLedger = [3, 1, 7].into_iter().collect();
//! assert_eq!(resolve_invoice(&mut invoice, &ledger).unwrap(), 8);
//!
//! let layout = LayoutConfig::new()
//!     .header_line("ACME Srl")
//!     .payment_instruction("eur", "IBAN IT00 0000 0000 0000 0000 00");
//! let blocks = compose(&invoice, &layout).unwrap();
//! let items = blocks.iter().find_map(|b| match b {
//!     RenderBlock::LineItems(t) => Some(t),
//!     _ => None,
//! }).unwrap();
//! assert_eq!(items.last_row().unwrap().text(), "Tot (EUR): 200.0 EUR");
//! assert_eq!(artifact_stem(8, invoice.customer().name.as_str()), "8_acme_corp");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Invoice model, numbering ledger, document composer |
//! | `pdf` | PDF rendering collaborator built on `lopdf` |
//! | `config` | YAML settings and invoice template loading |
//! | `cli` | The `invoicer` binary |
//! | `all` | Everything (also the default) |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "pdf")]
pub mod pdf;

#[cfg(feature = "config")]
pub mod config;

#[cfg(feature = "config")]
pub mod template;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
