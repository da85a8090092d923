//! PDF rendering collaborator.
//!
//! Draws composed [`RenderBlock`]s onto pages with the standard Helvetica
//! fonts, so no font files are embedded. Tables that do not fit are continued
//! on a new page, repeating their header row when the table asks for it.

mod canvas;
mod encoding;

use lopdf::content::Content;
use lopdf::{Document, Object, Stream, dictionary};
use serde::{Deserialize, Serialize};

use crate::core::{InvoicerError, RenderBlock, Renderer, Result};
use canvas::{BOLD_FONT, Canvas, REGULAR_FONT};

pub use encoding::win_ansi;

/// Extension of rendered artifacts.
pub const PDF_EXTENSION: &str = "pdf";

/// Paper size in PDF points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSize {
    /// US Letter, 612 × 792.
    #[default]
    Letter,
    /// ISO A4, 595 × 842.
    A4,
}

impl PageSize {
    pub fn width(&self) -> f32 {
        match self {
            Self::Letter => 612.0,
            Self::A4 => 595.0,
        }
    }

    pub fn height(&self) -> f32 {
        match self {
            Self::Letter => 792.0,
            Self::A4 => 842.0,
        }
    }
}

/// Renders blocks to a PDF document.
#[derive(Debug, Clone, Default)]
pub struct PdfRenderer {
    page_size: PageSize,
    title: Option<String>,
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self
    }

    /// Document title stored in the PDF info dictionary.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl Renderer for PdfRenderer {
    fn extension(&self) -> &str {
        PDF_EXTENSION
    }

    fn render(&self, blocks: &[RenderBlock]) -> Result<Vec<u8>> {
        let pages = Canvas::new(self.page_size).layout(blocks);

        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(font_dict("Helvetica"));
        let bold_id = doc.add_object(font_dict("Helvetica-Bold"));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR_FONT => Object::Reference(regular_id),
                BOLD_FONT => Object::Reference(bold_id),
            },
        });

        let media_box: Vec<Object> = vec![
            Object::Integer(0),
            Object::Integer(0),
            self.page_size.width().into(),
            self.page_size.height().into(),
        ];

        let mut kids = Vec::with_capacity(pages.len());
        for operations in pages {
            let content = Content { operations }
                .encode()
                .map_err(|e| InvoicerError::Render(format!("failed to encode page content: {e}")))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "MediaBox" => media_box.clone(),
                "Contents" => Object::Reference(content_id),
                "Resources" => Object::Reference(resources_id),
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut info = dictionary! {
            "Producer" => Object::string_literal(concat!("invoicer ", env!("CARGO_PKG_VERSION"))),
        };
        if let Some(title) = &self.title {
            info.set("Title", Object::string_literal(title.as_str()));
        }
        let info_id = doc.add_object(info);
        doc.trailer.set("Info", Object::Reference(info_id));

        let mut output = Vec::new();
        doc.save_to(&mut output)
            .map_err(|e| InvoicerError::Render(format!("failed to save PDF: {e}")))?;

        tracing::debug!(pages = count, bytes = output.len(), "rendered PDF");
        Ok(output)
    }
}

fn font_dict(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}
