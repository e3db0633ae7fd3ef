//! Worksheet layout for the xlsx export.
//!
//! The header block always starts at `A1`: issuer lines down column A, the
//! document title at `E1` with its reference fields below it. Everything
//! else follows top to bottom in payload order, one blank row between blocks.

use serde::Serialize;

use crate::payload::{Block, DocumentPayload, Field, Table, TableRole, TotalLine, Value};

/// Column holding the document title and reference fields.
pub const TITLE_COLUMN: u16 = 4;
const CHARS_PER_WEIGHT: f64 = 12.0;
const MIN_COLUMN_WIDTH: f64 = 10.0;
const DEFAULT_COLUMN_WIDTH: f64 = 15.0;
const DEFAULT_COLUMNS: u16 = 6;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum CellStyle {
    Normal,
    Bold,
    Title,
    /// Shaded table column label.
    ColumnLabel,
    GrandTotal,
    Small,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub row: u32,
    pub col: u16,
    pub value: Value,
    pub style: CellStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabularWorkbook {
    pub sheet_name: String,
    pub cells: Vec<Cell>,
    pub column_widths: Vec<f64>,
}

impl TabularWorkbook {
    pub fn cell(&self, row: u32, col: u16) -> Option<&Cell> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    /// Cell by A1-style address, e.g. `"E1"`. Single-letter columns only.
    pub fn at(&self, address: &str) -> Option<&Cell> {
        let mut chars = address.chars();
        let letter = chars.next()?;
        if !letter.is_ascii_uppercase() {
            return None;
        }
        let row: u32 = chars.as_str().parse().ok()?;
        self.cell(row.checked_sub(1)?, letter as u16 - u16::from(b'A'))
    }

    pub fn row_count(&self) -> u32 {
        self.cells.iter().map(|c| c.row + 1).max().unwrap_or(0)
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.cells.iter().any(|c| c.value.display() == needle)
    }
}

struct Sheet {
    cells: Vec<Cell>,
    row: u32,
    /// Column count of the last table written; totals align to its right edge.
    table_width: u16,
}

impl Sheet {
    fn put(&mut self, row: u32, col: u16, value: Value, style: CellStyle) {
        if value == Value::Empty {
            return;
        }
        if let Value::Text(text) = &value {
            if text.is_empty() {
                return;
            }
        }
        self.cells.push(Cell {
            row,
            col,
            value,
            style,
        });
    }

    fn text_line(&mut self, text: &str, style: CellStyle) {
        self.put(self.row, 0, Value::text(text), style);
        self.row += 1;
    }

    fn blank(&mut self) {
        self.row += 1;
    }

    fn masthead(&mut self, issuer: &[String], title: &str, meta: &[Field]) {
        let top = self.row;
        for (i, line) in issuer.iter().enumerate() {
            let style = if i == 0 { CellStyle::Title } else { CellStyle::Normal };
            self.put(top + i as u32, 0, Value::text(line), style);
        }
        self.put(top, TITLE_COLUMN, Value::text(title), CellStyle::Title);
        for (i, field) in meta.iter().enumerate() {
            let text = format!("{} {}", field.label, field.value);
            self.put(top + 1 + i as u32, TITLE_COLUMN, Value::text(text), CellStyle::Normal);
        }
        let height = issuer.len().max(meta.len() + 1) as u32;
        self.row = top + height;
        self.blank();
    }

    fn party(&mut self, heading: Option<&str>, lines: &[String]) {
        if let Some(heading) = heading {
            self.text_line(heading, CellStyle::Bold);
        }
        for line in lines {
            self.text_line(line, CellStyle::Normal);
        }
        self.blank();
    }

    fn details(&mut self, fields: &[Field]) {
        for field in fields {
            self.put(self.row, 0, Value::text(&field.label), CellStyle::Bold);
            self.put(self.row, 1, Value::text(&field.value), CellStyle::Normal);
            self.row += 1;
        }
        self.blank();
    }

    fn table(&mut self, table: &Table) {
        if let Some(heading) = &table.heading {
            self.text_line(heading, CellStyle::Bold);
        }
        for (col, column) in table.columns.iter().enumerate() {
            self.put(self.row, col as u16, Value::text(&column.label), CellStyle::ColumnLabel);
        }
        self.row += 1;
        for values in &table.rows {
            for (col, value) in values.iter().enumerate() {
                self.put(self.row, col as u16, value.clone(), CellStyle::Normal);
            }
            self.row += 1;
        }
        if table.role == TableRole::Items {
            self.table_width = table.columns.len() as u16;
        }
        self.blank();
    }

    fn totals(&mut self, lines: &[TotalLine]) {
        let value_col = self.table_width.max(2) - 1;
        for total in lines {
            let style = if total.emphasis { CellStyle::GrandTotal } else { CellStyle::Bold };
            self.put(self.row, value_col - 1, Value::text(&total.label), style);
            self.put(self.row, value_col, total.value.clone(), style);
            self.row += 1;
        }
        self.blank();
    }

    fn section(&mut self, heading: &str, lines: &[String]) {
        self.text_line(heading, CellStyle::Bold);
        for line in lines {
            self.text_line(line, CellStyle::Normal);
        }
        self.blank();
    }
}

fn column_widths(payload: &DocumentPayload) -> Vec<f64> {
    match payload.items_table() {
        Some(table) => table
            .columns
            .iter()
            .map(|c| (f64::from(c.weight) * CHARS_PER_WEIGHT).max(MIN_COLUMN_WIDTH))
            .collect(),
        None => vec![DEFAULT_COLUMN_WIDTH; usize::from(DEFAULT_COLUMNS)],
    }
}

/// Lay the payload out on a single named worksheet.
pub fn render_spreadsheet(payload: &DocumentPayload) -> TabularWorkbook {
    let mut sheet = Sheet {
        cells: Vec::new(),
        row: 0,
        table_width: DEFAULT_COLUMNS,
    };

    for block in &payload.blocks {
        match block {
            Block::Masthead {
                issuer,
                title,
                meta,
            } => sheet.masthead(issuer, title, meta),
            Block::Party { heading, lines } => sheet.party(heading.as_deref(), lines),
            Block::Details { fields } => sheet.details(fields),
            Block::Paragraph { text } => {
                sheet.text_line(text, CellStyle::Normal);
                sheet.blank();
            }
            Block::Table(table) => sheet.table(table),
            Block::Totals { lines } => sheet.totals(lines),
            Block::Section { heading, lines } => sheet.section(heading, lines),
            Block::FinePrint { text } => sheet.text_line(text, CellStyle::Small),
        }
    }

    TabularWorkbook {
        sheet_name: payload.kind.sheet_name().to_string(),
        cells: sheet.cells,
        column_widths: column_widths(payload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::Project;
    use chrono::NaiveDate;
    use docforge_core::IssuerProfile;
    use docforge_invoicing::{DeliveryNote, DeliveryNoteField, DeliveryNoteItemField};
    use docforge_sales::{Quotation, QuotationField};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 23).unwrap()
    }

    fn reference_note() -> DeliveryNote {
        let mut note = DeliveryNote::new(&IssuerProfile::default(), today());
        note.set_header_field(DeliveryNoteField::InvoiceNumber, "0042");
        note.set_header_field(DeliveryNoteField::TaxRate, "16");
        for (i, (qty, price)) in [("10", "85"), ("1", "1200")].into_iter().enumerate() {
            note.add_item();
            note.update_item(i, DeliveryNoteItemField::Quantity, qty);
            note.update_item(i, DeliveryNoteItemField::UnitPrice, price);
        }
        note
    }

    #[test]
    fn header_block_starts_at_a1() {
        let book = render_spreadsheet(&reference_note().project(today()));
        assert_eq!(book.sheet_name, "Nota de entrega");
        assert_eq!(book.at("A1").map(|c| c.value.display()).as_deref(), Some("Nosglobal Logistic"));
        assert_eq!(book.at("E1").map(|c| c.value.display()).as_deref(), Some("NOTA DE ENTREGA"));
        assert_eq!(book.at("E2").map(|c| c.value.display()).as_deref(), Some("No: 0042"));
    }

    #[test]
    fn reference_figures_are_numeric_cells() {
        let book = render_spreadsheet(&reference_note().project(today()));
        let grand = book
            .cells
            .iter()
            .find(|c| c.style == CellStyle::GrandTotal && c.value.number().is_some())
            .unwrap();
        assert_eq!(grand.value, Value::Currency(2378.0));
        assert_eq!(grand.col, 5);
        assert!(book.contains_text("$2,050.00"));
        assert!(book.contains_text("$328.00"));
    }

    #[test]
    fn item_rows_follow_the_label_row() {
        let book = render_spreadsheet(&reference_note().project(today()));
        let label = book.cells.iter().find(|c| c.style == CellStyle::ColumnLabel).unwrap();
        assert_eq!(label.col, 0);
        assert_eq!(label.value.display(), "Código");

        let first_row = label.row + 1;
        assert_eq!(book.cell(first_row, 2).map(|c| &c.value), Some(&Value::Integer(10)));
        assert_eq!(book.cell(first_row, 5).map(|c| &c.value), Some(&Value::Currency(850.0)));
        assert_eq!(book.cell(first_row + 1, 5).map(|c| &c.value), Some(&Value::Currency(1200.0)));
    }

    #[test]
    fn conditional_sections_only_when_filled() {
        let mut quote = Quotation::new(&IssuerProfile::default(), today());
        let book = render_spreadsheet(&quote.project(today()));
        assert!(!book.contains_text("TÉRMINOS DE PAGO:"));
        assert!(!book.contains_text("Descuento:"));

        quote.set_header_field(QuotationField::PaymentTerms, "50% anticipo");
        let book = render_spreadsheet(&quote.project(today()));
        assert!(book.contains_text("TÉRMINOS DE PAGO:"));
        assert!(book.contains_text("50% anticipo"));
    }

    #[test]
    fn column_widths_follow_item_columns() {
        let book = render_spreadsheet(&reference_note().project(today()));
        assert_eq!(book.column_widths.len(), 6);
        assert!(book.column_widths.iter().all(|w| *w >= MIN_COLUMN_WIDTH));
    }
}
