//! Invoice model, numbering and document composition.
//!
//! The only I/O here is [`DirectoryLedger`], which lists (and, for
//! reservations, creates sentinels in) the output directory, and
//! [`write_artifact`].

mod builder;
mod compose;
mod error;
mod format;
mod layout;
mod numbering;
mod render;
mod summary;
mod types;
mod validation;

pub use builder::*;
pub use compose::*;
pub use error::*;
pub use format::NumberFormat;
pub use layout::LayoutConfig;
pub use numbering::*;
pub use render::{Renderer, write_artifact};
pub use summary::InvoiceSummary;
pub use types::*;
pub use validation::*;
