//! Byte encoders behind the two file formats.
//!
//! Layout is pure and lives in [`crate::paginated`] and [`crate::tabular`];
//! encoders only serialize a finished layout, so a failing encoder can be
//! swapped in without touching any document logic.

use crate::error::ExportResult;
use crate::paginated::PaginatedDocument;
use crate::tabular::TabularWorkbook;

pub trait DocumentEncoder: Send + Sync {
    fn encode(&self, document: &PaginatedDocument) -> ExportResult<Vec<u8>>;
}

pub trait WorkbookEncoder: Send + Sync {
    fn encode(&self, workbook: &TabularWorkbook) -> ExportResult<Vec<u8>>;
}
