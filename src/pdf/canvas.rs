use lopdf::content::Operation;
use lopdf::{Object, StringFormat};

use super::PageSize;
use super::encoding::win_ansi;
use crate::core::{RenderBlock, Row, Shade, Table};

/// Font resource names registered on every page.
pub const REGULAR_FONT: &str = "F1";
pub const BOLD_FONT: &str = "F2";

const MARGIN: f32 = 72.0;
const PAD_X: f32 = 6.0;
const PAD_Y: f32 = 4.0;
const LEADING: f32 = 1.2;
const SHADE_GRAY: f32 = 0.83;
const GRID_WIDTH: f32 = 0.25;

/// Top-down layout state: finished pages plus the page being filled.
pub struct Canvas {
    size: PageSize,
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    y: f32,
}

impl Canvas {
    pub fn new(size: PageSize) -> Self {
        Self {
            size,
            pages: Vec::new(),
            ops: Vec::new(),
            y: size.height() - MARGIN,
        }
    }

    /// Lay out every block and return the content operations per page.
    pub fn layout(mut self, blocks: &[RenderBlock]) -> Vec<Vec<Operation>> {
        for block in blocks {
            match block {
                RenderBlock::Spacer(height) => self.space(*height),
                RenderBlock::Identity {
                    header,
                    customer,
                    column_widths,
                } => self.side_by_side(header, customer, *column_widths),
                RenderBlock::Metadata(t)
                | RenderBlock::LineItems(t)
                | RenderBlock::Payment(t)
                | RenderBlock::Footer(t) => {
                    let x = self.centered(total_width(t));
                    self.table(t, x, true);
                }
            }
        }
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.pages.push(self.ops);
        }
        self.pages
    }

    fn top(&self) -> f32 {
        self.size.height() - MARGIN
    }

    fn at_top(&self) -> bool {
        self.y >= self.top()
    }

    fn new_page(&mut self) {
        let finished = std::mem::take(&mut self.ops);
        self.pages.push(finished);
        self.y = self.top();
    }

    fn fits(&self, height: f32) -> bool {
        self.y - height >= MARGIN
    }

    fn centered(&self, width: f32) -> f32 {
        ((self.size.width() - width) / 2.0).max(0.0)
    }

    fn space(&mut self, height: f32) {
        if self.fits(height) {
            self.y -= height;
        } else {
            self.new_page();
        }
    }

    fn side_by_side(&mut self, left: &Table, right: &Table, widths: [f32; 2]) {
        let height = table_height(left).max(table_height(right));
        if !self.fits(height) && !self.at_top() {
            self.new_page();
        }
        let x = self.centered(widths[0] + widths[1]);
        let top = self.y;
        self.table(left, x, false);
        let left_bottom = self.y;
        self.y = top;
        self.table(right, x + widths[0], false);
        self.y = self.y.min(left_bottom);
    }

    fn table(&mut self, table: &Table, x: f32, may_break: bool) {
        let header = table
            .rows
            .first()
            .filter(|_| table.style.repeat_header);

        for (index, row) in table.rows.iter().enumerate() {
            let height = row_height(table, row);
            if may_break && !self.fits(height) && !self.at_top() {
                self.new_page();
                if let Some(header) = header.filter(|_| index > 0) {
                    self.row(table, header, 0, x);
                }
            }
            self.row(table, row, index, x);
        }
    }

    fn row(&mut self, table: &Table, row: &Row, index: usize, x: f32) {
        let style = &table.style;
        let height = row_height(table, row);
        let top = self.y;
        let bottom = top - height;

        let shaded = match style.shade {
            Shade::None => false,
            Shade::HeaderRow => index == 0,
            Shade::AllRows => true,
        };
        if shaded {
            self.fill_rect(x, bottom, total_width(table), height);
        }

        let font = if row.emphasized { BOLD_FONT } else { REGULAR_FONT };
        let mut cell_x = x;
        for (col, width) in table.column_widths.iter().enumerate() {
            if style.grid {
                self.stroke_rect(cell_x, bottom, *width, height);
            }
            if let Some(text) = row.cells.get(col) {
                for (line_no, line) in text.lines().enumerate() {
                    let baseline = top - PAD_Y - style.font_size - line_no as f32 * style.font_size * LEADING;
                    self.text(font, style.font_size, cell_x + PAD_X, baseline, line);
                }
            }
            cell_x += width;
        }

        self.y = bottom;
    }

    fn text(&mut self, font: &str, size: f32, x: f32, y: f32, text: &str) {
        if text.is_empty() {
            return;
        }
        self.ops.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.into(), size.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new(
                "Tj",
                vec![Object::String(win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ops.extend([
            Operation::new("q", vec![]),
            Operation::new("g", vec![SHADE_GRAY.into()]),
            Operation::new("re", vec![x.into(), y.into(), w.into(), h.into()]),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ops.extend([
            Operation::new("q", vec![]),
            Operation::new("w", vec![GRID_WIDTH.into()]),
            Operation::new("re", vec![x.into(), y.into(), w.into(), h.into()]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }
}

fn total_width(table: &Table) -> f32 {
    table.column_widths.iter().sum()
}

fn row_height(table: &Table, row: &Row) -> f32 {
    if let Some(fixed) = table.style.row_height {
        return fixed;
    }
    let lines = row
        .cells
        .iter()
        .map(|c| c.lines().count())
        .max()
        .unwrap_or(0)
        .max(1);
    lines as f32 * table.style.font_size * LEADING + 2.0 * PAD_Y
}

fn table_height(table: &Table) -> f32 {
    table.rows.iter().map(|r| row_height(table, r)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_column(rows: usize) -> Table {
        Table {
            column_widths: vec![100.0],
            rows: (0..rows).map(|i| Row::new([format!("row {i}")])).collect(),
            style: Default::default(),
        }
    }

    #[test]
    fn wrapped_rows_are_taller() {
        let table = single_column(1);
        let one = row_height(&table, &Row::new(["a"]));
        let two = row_height(&table, &Row::new(["a\nb"]));
        assert!(two > one);
    }

    #[test]
    fn fixed_row_height_wins() {
        let mut table = single_column(1);
        table.style.row_height = Some(20.0);
        assert_eq!(row_height(&table, &Row::new(["a\nb\nc"])), 20.0);
    }

    #[test]
    fn long_tables_break_pages() {
        let pages = Canvas::new(PageSize::Letter).layout(&[RenderBlock::Footer(single_column(200))]);
        assert!(pages.len() > 1);
        assert!(pages.iter().all(|ops| !ops.is_empty()));
    }

    #[test]
    fn break_before_empty_table_leaves_no_blank_page() {
        let empty = Table {
            column_widths: vec![100.0],
            rows: Vec::new(),
            style: Default::default(),
        };
        let pages = Canvas::new(PageSize::Letter).layout(&[
            RenderBlock::Payment(single_column(1)),
            RenderBlock::Spacer(10_000.0),
            RenderBlock::Footer(empty),
        ]);
        assert_eq!(pages.len(), 1);
        assert!(!pages[0].is_empty());
    }

    #[test]
    fn short_document_single_page() {
        let pages = Canvas::new(PageSize::A4).layout(&[
            RenderBlock::Spacer(24.0),
            RenderBlock::Payment(single_column(1)),
        ]);
        assert_eq!(pages.len(), 1);
    }
}
