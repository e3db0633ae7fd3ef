//! `docforge-export` — document payloads and the PDF/xlsx renderers.
//!
//! Flow: an aggregate is projected into a [`DocumentPayload`]; the payload is
//! laid out as a [`PaginatedDocument`] or a [`TabularWorkbook`]; a backend
//! encodes that layout into file bytes.

pub mod encoder;
pub mod error;
pub mod filename;
pub mod format;
pub mod paginated;
pub mod payload;
pub mod pdf;
pub mod projections;
pub mod tabular;
pub mod text;
pub mod xlsx;

pub use encoder::{DocumentEncoder, WorkbookEncoder};
pub use error::{ExportError, ExportResult};
pub use filename::{export_filename, random_suffix};
pub use format::ExportFormat;
pub use paginated::{PaginatedDocument, render_document};
pub use payload::{Block, DocumentKind, DocumentPayload, Value};
pub use pdf::PdfBackend;
pub use projections::{Project, project};
pub use tabular::{TabularWorkbook, render_spreadsheet};
pub use text::quotation_text;
pub use xlsx::XlsxBackend;

/// Lay out and encode a payload in `format`.
pub fn encode(
    payload: &DocumentPayload,
    format: ExportFormat,
    pdf: &dyn DocumentEncoder,
    xlsx: &dyn WorkbookEncoder,
) -> ExportResult<Vec<u8>> {
    match format {
        ExportFormat::Pdf => pdf.encode(&render_document(payload)),
        ExportFormat::Xlsx => xlsx.encode(&render_spreadsheet(payload)),
    }
}
