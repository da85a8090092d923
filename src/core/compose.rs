//! Lays an invoice out as an ordered list of [`RenderBlock`]s.
//!
//! The composer decides *what* goes on the page and in which order. Turning
//! blocks into bytes (fonts, pagination, drawing) is the job of a renderer,
//! see `crate::pdf`.

use super::error::{InvoicerError, Result};
use super::format::NumberFormat;
use super::layout::LayoutConfig;
use super::numbering::SEPARATOR;
use super::types::Invoice;

/// Column at which item descriptions are wrapped.
pub const DESCRIPTION_WIDTH: usize = 40;

/// Rows in the customer column of the identity block, padding included.
pub const CUSTOMER_ROWS: usize = 7;

/// Column headings of the line-item table.
pub const ITEM_HEADINGS: [&str; 4] = ["Description", "Quantity", "Unit Price", "Total Price"];

const IDENTITY_WIDTHS: [f32; 2] = [265.0, 300.0];
const METADATA_WIDTHS: [f32; 2] = [240.0, 300.0];
const ITEM_WIDTHS: [f32; 4] = [250.0, 90.0, 100.0, 100.0];
const FULL_WIDTH: f32 = 550.0;
const FOOTER_ROW_HEIGHT: f32 = 20.0;

/// One table row. Cells may contain `\n` for pre-wrapped text.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub cells: Vec<String>,
    /// Printed in the bold face.
    pub emphasized: bool,
}

impl Row {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            emphasized: false,
        }
    }

    pub fn emphasized(mut self) -> Self {
        self.emphasized = true;
        self
    }

    fn blank() -> Self {
        Self::new([""])
    }

    /// Non-empty cells joined by a single space.
    pub fn text(&self) -> String {
        self.cells
            .iter()
            .filter(|c| !c.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Which rows get a light grey background.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Shade {
    #[default]
    None,
    HeaderRow,
    AllRows,
}

/// Presentation hints for a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    pub font_size: f32,
    /// Draw inner grid and outer box.
    pub grid: bool,
    pub shade: Shade,
    /// Repeat the first row at the top of each new page.
    pub repeat_header: bool,
    /// Fixed row height; `None` sizes rows to their content.
    pub row_height: Option<f32>,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            grid: false,
            shade: Shade::None,
            repeat_header: false,
            row_height: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub column_widths: Vec<f32>,
    pub rows: Vec<Row>,
    pub style: TableStyle,
}

impl Table {
    fn new(column_widths: &[f32], rows: Vec<Row>, style: TableStyle) -> Self {
        Self {
            column_widths: column_widths.to_vec(),
            rows,
            style,
        }
    }

    /// The last row, e.g. the total row of the line-item table.
    pub fn last_row(&self) -> Option<&Row> {
        self.rows.last()
    }
}

/// Structural unit of the printed invoice, in page order.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderBlock {
    /// Issuer header (left) beside the customer identity (right).
    Identity {
        header: Table,
        customer: Table,
        column_widths: [f32; 2],
    },
    /// Invoice date and number.
    Metadata(Table),
    /// Items and the total row.
    LineItems(Table),
    /// Currency-specific payment instruction.
    Payment(Table),
    Footer(Table),
    /// Vertical gap in points.
    Spacer(f32),
}

/// Discriminant of a [`RenderBlock`], handy for asserting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Identity,
    Metadata,
    LineItems,
    Payment,
    Footer,
    Spacer,
}

impl RenderBlock {
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Identity { .. } => BlockKind::Identity,
            Self::Metadata(_) => BlockKind::Metadata,
            Self::LineItems(_) => BlockKind::LineItems,
            Self::Payment(_) => BlockKind::Payment,
            Self::Footer(_) => BlockKind::Footer,
            Self::Spacer(_) => BlockKind::Spacer,
        }
    }

    /// The table carried by single-table blocks.
    pub fn table(&self) -> Option<&Table> {
        match self {
            Self::Metadata(t) | Self::LineItems(t) | Self::Payment(t) | Self::Footer(t) => Some(t),
            Self::Identity { .. } | Self::Spacer(_) => None,
        }
    }
}

/// Lay out a numbered invoice.
///
/// Fails with [`InvoicerError::UnknownCurrency`] when `layout` has no payment
/// instruction for the invoice currency, and with
/// [`InvoicerError::UnresolvedNumber`] for an invoice still pending
/// numbering. Nothing is produced on failure.
///
/// Totals are always recomputed from the items.
pub fn compose(invoice: &Invoice, layout: &LayoutConfig) -> Result<Vec<RenderBlock>> {
    let number = invoice.number().ok_or(InvoicerError::UnresolvedNumber)?;
    let instruction = layout
        .instruction_for(invoice.currency())
        .ok_or_else(|| InvoicerError::UnknownCurrency(invoice.currency().to_string()))?;
    let fmt = layout.format();

    let blocks = vec![
        identity_block(invoice, layout),
        RenderBlock::Spacer(24.0),
        metadata_block(invoice, number),
        RenderBlock::Spacer(24.0),
        RenderBlock::LineItems(items_table(invoice, fmt)?),
        RenderBlock::Spacer(12.0),
        payment_block(instruction),
        RenderBlock::Spacer(12.0),
        footer_block(layout),
    ];

    tracing::debug!(number, blocks = blocks.len(), "composed invoice");
    Ok(blocks)
}

fn identity_block(invoice: &Invoice, layout: &LayoutConfig) -> RenderBlock {
    let header_rows = layout
        .header_lines()
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let row = Row::new([line.as_str()]);
            if i == 0 { row.emphasized() } else { row }
        })
        .collect();

    let customer = invoice.customer();
    let mut customer_rows = vec![
        Row::new([customer.name.as_str()]).emphasized(),
        Row::new([customer.address_line1.as_str()]),
        Row::new([customer.address_line2.as_str()]),
        Row::new([customer.business_number.as_str()]),
    ];
    customer_rows.resize(CUSTOMER_ROWS, Row::blank());

    RenderBlock::Identity {
        header: Table::new(&[IDENTITY_WIDTHS[0]], header_rows, TableStyle::default()),
        customer: Table::new(&[IDENTITY_WIDTHS[1]], customer_rows, TableStyle::default()),
        column_widths: IDENTITY_WIDTHS,
    }
}

fn metadata_block(invoice: &Invoice, number: u64) -> RenderBlock {
    let rows = vec![
        Row::new(["Invoice Date:", invoice.date()]),
        Row::new(["Invoice Number:".to_string(), number.to_string()]),
    ];
    let style = TableStyle {
        font_size: 12.0,
        shade: Shade::AllRows,
        ..TableStyle::default()
    };
    RenderBlock::Metadata(Table::new(&METADATA_WIDTHS, rows, style))
}

/// Header row, one row per item, then the emphasized total row.
pub fn items_table(invoice: &Invoice, fmt: NumberFormat) -> Result<Table> {
    let mut rows = Vec::with_capacity(invoice.items().len() + 2);
    rows.push(Row::new(ITEM_HEADINGS).emphasized());

    for item in invoice.items() {
        rows.push(Row::new([
            wrap(item.description(), DESCRIPTION_WIDTH).join("\n"),
            fmt.format(item.quantity()),
            fmt.format(item.unit_price()),
            fmt.format(item.line_total()?),
        ]));
    }

    let currency = invoice.currency();
    rows.push(
        Row::new([
            format!("Tot ({currency}):"),
            String::new(),
            String::new(),
            format!("{} {currency}", fmt.format(invoice.total()?)),
        ])
        .emphasized(),
    );

    let style = TableStyle {
        grid: true,
        shade: Shade::HeaderRow,
        repeat_header: true,
        ..TableStyle::default()
    };
    Ok(Table::new(&ITEM_WIDTHS, rows, style))
}

fn payment_block(instruction: &str) -> RenderBlock {
    let rows = vec![Row::new([instruction]).emphasized()];
    RenderBlock::Payment(Table::new(&[FULL_WIDTH], rows, TableStyle::default()))
}

fn footer_block(layout: &LayoutConfig) -> RenderBlock {
    let rows = layout
        .footer_lines()
        .iter()
        .map(|line| Row::new([line.as_str()]).emphasized())
        .collect();
    let style = TableStyle {
        row_height: Some(FOOTER_ROW_HEIGHT),
        ..TableStyle::default()
    };
    RenderBlock::Footer(Table::new(&[FULL_WIDTH], rows, style))
}

/// File name of the artifact without extension:
/// `{number}_{customer name lowercased, spaces replaced by _}`.
///
/// Path separators and characters that are not allowed in file names also
/// become `_`, so the stem always names a file directly inside the ledger
/// directory.
pub fn artifact_stem(number: u64, customer_name: &str) -> String {
    let name: String = customer_name
        .to_lowercase()
        .chars()
        .map(|c| if is_file_name_safe(c) { c } else { '_' })
        .collect();
    format!("{number}{SEPARATOR}{name}")
}

fn is_file_name_safe(c: char) -> bool {
    !(c.is_whitespace()
        || c.is_control()
        || std::path::is_separator(c)
        || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
}

/// Greedy paragraph fill.
///
/// Whitespace runs collapse to one space; words go onto the current line while
/// it stays within `width` characters; a word longer than `width` is split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let mut rest = word;
        while !rest.is_empty() {
            let len = rest.chars().count();
            let needed = if line_len == 0 { len } else { line_len + 1 + len };
            if needed <= width {
                if line_len > 0 {
                    line.push(' ');
                }
                line.push_str(rest);
                line_len = needed;
                break;
            }
            if line_len > 0 {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
                continue;
            }
            let cut = rest
                .char_indices()
                .nth(width)
                .map_or(rest.len(), |(i, _)| i);
            lines.push(rest[..cut].to_string());
            rest = &rest[cut..];
        }
    }
    if line_len > 0 {
        lines.push(line);
    }
    lines
}
