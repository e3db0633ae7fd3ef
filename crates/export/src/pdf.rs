//! PDF encoding with `printpdf` builtin Helvetica fonts.

use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Pt};
use tracing::debug;

use crate::encoder::DocumentEncoder;
use crate::error::{ExportError, ExportResult};
use crate::paginated::{DrawOp, Page, PaginatedDocument, Weight};

const LAYER: &str = "content";

#[derive(Debug, Default, Clone, Copy)]
pub struct PdfBackend;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn draw(layer: &PdfLayerReference, fonts: &Fonts, page: &Page) {
    for op in &page.ops {
        match op {
            DrawOp::Text {
                x,
                y,
                size,
                weight,
                text,
            } => {
                let font = match weight {
                    Weight::Regular => &fonts.regular,
                    Weight::Bold => &fonts.bold,
                };
                layer.use_text(text.as_str(), *size, Mm::from(Pt(*x)), Mm::from(Pt(*y)), font);
            }
            DrawOp::Rule { x1, y1, x2, y2 } => {
                layer.add_line(Line {
                    points: vec![
                        (Point::new(Mm::from(Pt(*x1)), Mm::from(Pt(*y1))), false),
                        (Point::new(Mm::from(Pt(*x2)), Mm::from(Pt(*y2))), false),
                    ],
                    is_closed: false,
                });
            }
        }
    }
}

impl DocumentEncoder for PdfBackend {
    fn encode(&self, document: &PaginatedDocument) -> ExportResult<Vec<u8>> {
        let width = Mm(document.width_mm);
        let height = Mm(document.height_mm);
        let (doc, first_page, first_layer) =
            PdfDocument::new(document.title.as_str(), width, height, LAYER);

        let fonts = Fonts {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| ExportError::Pdf(e.to_string()))?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| ExportError::Pdf(e.to_string()))?,
        };

        for (index, page) in document.pages.iter().enumerate() {
            let (page_ref, layer_ref) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(width, height, LAYER)
            };
            let layer = doc.get_page(page_ref).get_layer(layer_ref);
            draw(&layer, &fonts, page);
        }

        let bytes = doc
            .save_to_bytes()
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        debug!(pages = document.pages.len(), bytes = bytes.len(), "pdf encoded");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paginated::render_document;
    use crate::projections::Project;
    use chrono::NaiveDate;
    use docforge_core::IssuerProfile;
    use docforge_statements::Statement;

    #[test]
    fn encodes_a_pdf_file() {
        let today = NaiveDate::from_ymd_opt(2025, 11, 23).unwrap();
        let statement = Statement::new(&IssuerProfile::default(), today);
        let document = render_document(&statement.project(today));

        let bytes = PdfBackend.encode(&document).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
