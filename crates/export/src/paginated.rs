//! Page layout for the PDF export.
//!
//! [`render_document`] flows a payload's blocks down US-letter pages and
//! produces positioned text runs and rules. Item tables continue onto new
//! pages with their column header repeated. Encoding the result into bytes is
//! a backend concern (see [`crate::pdf`]).

use serde::Serialize;

use crate::payload::{Align, Block, Column, DocumentPayload, Field, Table, TableRole, TotalLine};

pub const PT_PER_MM: f32 = 72.0 / 25.4;
pub const PAGE_WIDTH_MM: f32 = 215.9;
pub const PAGE_HEIGHT_MM: f32 = 279.4;
pub const MARGIN_PT: f32 = 40.0;

const BODY_SIZE: f32 = 9.0;
const HEADING_SIZE: f32 = 10.0;
const TITLE_SIZE: f32 = 16.0;
const GRAND_TOTAL_SIZE: f32 = 12.0;
const FINE_PRINT_SIZE: f32 = 7.0;
const LEADING: f32 = 1.35;
const CELL_PADDING: f32 = 4.0;
/// Average Helvetica advance as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;
const BOLD_GLYPH_WIDTH: f32 = 0.55;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Weight {
    Regular,
    Bold,
}

/// Positioned drawing instruction. Coordinates are PDF points, origin at the
/// bottom-left corner of the page; `y` of a text run is its baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        size: f32,
        weight: Weight,
        text: String,
    },
    Rule {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Rule { .. } => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedDocument {
    pub title: String,
    pub width_mm: f32,
    pub height_mm: f32,
    pub pages: Vec<Page>,
}

impl PaginatedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(Page::texts)
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|text| text == needle)
    }
}

pub fn text_width(text: &str, size: f32, weight: Weight) -> f32 {
    let factor = match weight {
        Weight::Regular => GLYPH_WIDTH,
        Weight::Bold => BOLD_GLYPH_WIDTH,
    };
    text.chars().count() as f32 * size * factor
}

/// Greedy word wrap against the estimated glyph width. Words longer than a
/// line are split.
pub fn wrap(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let per_line = ((max_width / (size * GLYPH_WIDTH)).floor() as usize).max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_len = 0usize;
        for word in paragraph.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();
            while chars.len() > per_line {
                if line_len > 0 {
                    lines.push(core::mem::take(&mut line));
                    line_len = 0;
                }
                lines.push(chars.drain(..per_line).collect());
            }
            let word_len = chars.len();
            if word_len == 0 {
                continue;
            }
            let needed = if line_len == 0 { word_len } else { line_len + 1 + word_len };
            if needed > per_line {
                lines.push(core::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.extend(chars);
            line_len += word_len;
        }
        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn line_height(size: f32) -> f32 {
    size * LEADING
}

struct Layout {
    width: f32,
    height: f32,
    done: Vec<Page>,
    page: Page,
    /// Distance from the top edge to the next free line.
    cursor: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            width: PAGE_WIDTH_MM * PT_PER_MM,
            height: PAGE_HEIGHT_MM * PT_PER_MM,
            done: Vec::new(),
            page: Page::default(),
            cursor: MARGIN_PT,
        }
    }

    fn left(&self) -> f32 {
        MARGIN_PT
    }

    fn right(&self) -> f32 {
        self.width - MARGIN_PT
    }

    fn content_width(&self) -> f32 {
        self.right() - self.left()
    }

    fn remaining(&self) -> f32 {
        self.height - MARGIN_PT - self.cursor
    }

    fn break_page(&mut self) {
        self.done.push(core::mem::take(&mut self.page));
        self.cursor = MARGIN_PT;
    }

    /// Start a new page unless `needed` points still fit. Returns whether a
    /// break happened.
    fn ensure(&mut self, needed: f32) -> bool {
        let at_top = self.cursor <= MARGIN_PT;
        if needed > self.remaining() && !at_top {
            self.break_page();
            return true;
        }
        false
    }

    fn gap(&mut self, points: f32) {
        self.cursor += points;
    }

    /// Text whose top sits `offset` below the cursor.
    fn text_at(&mut self, x: f32, offset: f32, size: f32, weight: Weight, text: &str) {
        if text.is_empty() {
            return;
        }
        let y = self.height - (self.cursor + offset + size);
        self.page.ops.push(DrawOp::Text {
            x,
            y,
            size,
            weight,
            text: text.to_string(),
        });
    }

    /// `span` is the `(x, width)` box the text aligns within.
    fn aligned(
        &mut self,
        align: Align,
        (x, width): (f32, f32),
        offset: f32,
        size: f32,
        weight: Weight,
        text: &str,
    ) {
        let run = text_width(text, size, weight);
        let x = match align {
            Align::Left => x,
            Align::Right => x + width - run,
            Align::Center => x + (width - run) / 2.0,
        };
        self.text_at(x, offset, size, weight, text);
    }

    fn rule(&mut self, offset: f32, x1: f32, x2: f32) {
        let y = self.height - (self.cursor + offset);
        self.page.ops.push(DrawOp::Rule { x1, y1: y, x2, y2: y });
    }

    /// One line of text at the cursor, then advance.
    fn line(&mut self, x: f32, size: f32, weight: Weight, text: &str) {
        self.ensure(line_height(size));
        self.text_at(x, 0.0, size, weight, text);
        self.cursor += line_height(size);
    }

    fn paragraph(&mut self, text: &str, size: f32) {
        let left = self.left();
        for line in wrap(text, self.content_width(), size) {
            self.line(left, size, Weight::Regular, &line);
        }
    }

    fn finish(mut self, title: String) -> PaginatedDocument {
        self.done.push(self.page);
        PaginatedDocument {
            title,
            width_mm: PAGE_WIDTH_MM,
            height_mm: PAGE_HEIGHT_MM,
            pages: self.done,
        }
    }

    fn masthead(&mut self, issuer: &[String], title: &str, meta: &[Field]) {
        let left = self.left();
        let right_column = self.content_width() * 0.4;
        let right_x = self.right() - right_column;

        let mut left_offset = 0.0;
        for (i, line) in issuer.iter().enumerate() {
            let (size, weight) = if i == 0 {
                (11.0, Weight::Bold)
            } else {
                (BODY_SIZE, Weight::Regular)
            };
            self.text_at(left, left_offset, size, weight, line);
            left_offset += line_height(size);
        }

        self.aligned(Align::Right, (right_x, right_column), 0.0, TITLE_SIZE, Weight::Bold, title);
        let mut right_offset = line_height(TITLE_SIZE) + 6.0;
        for field in meta {
            let text = format!("{} {}", field.label, field.value);
            self.aligned(
                Align::Right,
                (right_x, right_column),
                right_offset,
                BODY_SIZE,
                Weight::Regular,
                &text,
            );
            right_offset += line_height(BODY_SIZE);
        }

        self.cursor += f32::max(left_offset, right_offset);
        self.gap(24.0);
    }

    fn party(&mut self, heading: Option<&str>, lines: &[String]) {
        let left = self.left();
        if let Some(heading) = heading {
            self.line(left, HEADING_SIZE, Weight::Bold, heading);
        }
        for line in lines {
            self.line(left, BODY_SIZE, Weight::Regular, line);
        }
        self.gap(18.0);
    }

    /// Two label/value pairs per row.
    fn details(&mut self, fields: &[Field]) {
        let left = self.left();
        let half = self.content_width() / 2.0;
        let label_width = half * 0.4;
        let row = line_height(BODY_SIZE) + 4.0;

        for pair in fields.chunks(2) {
            self.ensure(row);
            for (i, field) in pair.iter().enumerate() {
                let x = left + half * i as f32;
                self.text_at(x + CELL_PADDING, 2.0, BODY_SIZE, Weight::Bold, &field.label);
                self.text_at(x + label_width, 2.0, BODY_SIZE, Weight::Regular, &field.value);
            }
            self.cursor += row;
            let right = self.right();
            self.rule(0.0, left, right);
        }
        self.gap(18.0);
    }

    fn column_edges(&self, columns: &[Column]) -> Vec<(f32, f32)> {
        let total: f32 = columns.iter().map(|c| c.weight).sum::<f32>().max(f32::EPSILON);
        let scale = self.content_width() / total;
        let mut x = self.left();
        columns
            .iter()
            .map(|column| {
                let width = column.weight * scale;
                let edge = (x, width);
                x += width;
                edge
            })
            .collect()
    }

    fn table_header(&mut self, columns: &[Column], edges: &[(f32, f32)]) {
        let row = line_height(BODY_SIZE) + CELL_PADDING * 2.0;
        for (column, (x, width)) in columns.iter().zip(edges) {
            self.aligned(
                column.align,
                (x + CELL_PADDING, width - CELL_PADDING * 2.0),
                CELL_PADDING,
                BODY_SIZE,
                Weight::Bold,
                &column.label.to_uppercase(),
            );
        }
        self.cursor += row;
        let (left, right) = (self.left(), self.right());
        self.rule(0.0, left, right);
    }

    fn table(&mut self, table: &Table) {
        let edges = self.column_edges(&table.columns);
        let header_height = line_height(BODY_SIZE) + CELL_PADDING * 2.0;

        let wrapped: Vec<Vec<Vec<String>>> = table
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&edges)
                    .map(|(value, (_, width))| {
                        wrap(&value.display(), width - CELL_PADDING * 2.0, BODY_SIZE)
                    })
                    .collect()
            })
            .collect();
        let row_heights: Vec<f32> = wrapped
            .iter()
            .map(|cells| {
                let lines = cells.iter().map(Vec::len).max().unwrap_or(1) as f32;
                lines * line_height(BODY_SIZE) + CELL_PADDING * 2.0
            })
            .collect();

        let heading_height = if table.heading.is_some() { line_height(HEADING_SIZE) } else { 0.0 };
        let first_row = row_heights.first().copied().unwrap_or(0.0);
        let keep_together = match table.role {
            TableRole::Summary => row_heights.iter().sum::<f32>(),
            TableRole::Items => first_row,
        };
        self.ensure(heading_height + header_height + keep_together);

        if let Some(heading) = &table.heading {
            let left = self.left();
            self.line(left, HEADING_SIZE, Weight::Bold, heading);
        }
        self.table_header(&table.columns, &edges);

        for (cells, height) in wrapped.iter().zip(&row_heights) {
            if self.ensure(*height) {
                self.table_header(&table.columns, &edges);
            }
            for ((lines, column), (x, width)) in cells.iter().zip(&table.columns).zip(&edges) {
                for (i, line) in lines.iter().enumerate() {
                    self.aligned(
                        column.align,
                        (x + CELL_PADDING, width - CELL_PADDING * 2.0),
                        CELL_PADDING + i as f32 * line_height(BODY_SIZE),
                        BODY_SIZE,
                        Weight::Regular,
                        line,
                    );
                }
            }
            self.cursor += height;
        }
        self.gap(16.0);
    }

    fn totals(&mut self, lines: &[TotalLine]) {
        let right = self.right();
        let value_width = 110.0;
        let label_right = right - value_width - 10.0;

        for total in lines {
            let (size, weight) = if total.emphasis {
                (GRAND_TOTAL_SIZE, Weight::Bold)
            } else {
                (BODY_SIZE, Weight::Regular)
            };
            let height = line_height(size) + if total.emphasis { 8.0 } else { 2.0 };
            self.ensure(height);
            if total.emphasis {
                self.rule(2.0, label_right - 100.0, right);
                self.gap(6.0);
            }
            let label_width = text_width(&total.label, size, weight);
            self.text_at(label_right - label_width, 0.0, size, weight, &total.label);
            let value = total.value.display();
            let value_x = right - text_width(&value, size, weight);
            self.text_at(value_x, 0.0, size, weight, &value);
            self.cursor += line_height(size) + 2.0;
        }
        self.gap(20.0);
    }

    fn section(&mut self, heading: &str, lines: &[String]) {
        self.ensure(line_height(HEADING_SIZE) + line_height(BODY_SIZE));
        let left = self.left();
        self.line(left, HEADING_SIZE, Weight::Bold, heading);
        for line in lines {
            self.paragraph(line, BODY_SIZE);
        }
        self.gap(12.0);
    }

    fn fine_print(&mut self, text: &str) {
        self.ensure(line_height(FINE_PRINT_SIZE) * 3.0);
        self.gap(6.0);
        let (left, right) = (self.left(), self.right());
        self.rule(0.0, left, right);
        self.gap(10.0);
        self.paragraph(text, FINE_PRINT_SIZE);
    }
}

/// Lay the payload out on US-letter pages.
pub fn render_document(payload: &DocumentPayload) -> PaginatedDocument {
    let mut layout = Layout::new();
    let mut title = payload.kind.sheet_name().to_string();

    for block in &payload.blocks {
        match block {
            Block::Masthead {
                issuer,
                title: heading,
                meta,
            } => {
                title = heading.clone();
                layout.masthead(issuer, heading, meta);
            }
            Block::Party { heading, lines } => layout.party(heading.as_deref(), lines),
            Block::Details { fields } => layout.details(fields),
            Block::Paragraph { text } => {
                layout.paragraph(text, BODY_SIZE);
                layout.gap(10.0);
            }
            Block::Table(table) => layout.table(table),
            Block::Totals { lines } => layout.totals(lines),
            Block::Section { heading, lines } => layout.section(heading, lines),
            Block::FinePrint { text } => layout.fine_print(text),
        }
    }

    layout.finish(title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::Project;
    use chrono::NaiveDate;
    use docforge_core::IssuerProfile;
    use docforge_invoicing::{DeliveryNote, DeliveryNoteField, DeliveryNoteItemField};
    use docforge_warehouse::WarehouseReceipt;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 23).unwrap()
    }

    fn note_with_items(count: usize) -> DeliveryNote {
        let mut note = DeliveryNote::new(&IssuerProfile::default(), today());
        note.set_header_field(DeliveryNoteField::TaxRate, "16");
        for i in 0..count {
            note.add_item();
            note.update_item(i, DeliveryNoteItemField::Quantity, "1");
            note.update_item(i, DeliveryNoteItemField::UnitPrice, "10");
        }
        note
    }

    #[test]
    fn pages_are_us_letter() {
        let doc = render_document(&note_with_items(1).project(today()));
        assert_eq!(doc.width_mm, 215.9);
        assert_eq!(doc.height_mm, 279.4);
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.title, "NOTA DE ENTREGA");
    }

    #[test]
    fn reference_totals_are_drawn() {
        let mut note = DeliveryNote::new(&IssuerProfile::default(), today());
        note.set_header_field(DeliveryNoteField::TaxRate, "16");
        for (i, (qty, price)) in [("10", "85"), ("1", "1200")].into_iter().enumerate() {
            note.add_item();
            note.update_item(i, DeliveryNoteItemField::Quantity, qty);
            note.update_item(i, DeliveryNoteItemField::UnitPrice, price);
        }

        let doc = render_document(&note.project(today()));
        assert!(doc.contains_text("$2,050.00"));
        assert!(doc.contains_text("$328.00"));
        assert!(doc.contains_text("$2,378.00"));
    }

    #[test]
    fn long_tables_repeat_their_header() {
        let doc = render_document(&note_with_items(120).project(today()));
        assert!(doc.page_count() > 1);
        for page in &doc.pages {
            assert!(page.texts().any(|t| t == "DESCRIPCIÓN"), "page without table header");
        }
        let rows = doc.texts().filter(|t| *t == "Nuevo Item").count();
        assert_eq!(rows, 120);
    }

    #[test]
    fn everything_stays_inside_margins() {
        let doc = render_document(&note_with_items(80).project(today()));
        let height = PAGE_HEIGHT_MM * PT_PER_MM;
        for page in &doc.pages {
            for op in &page.ops {
                if let DrawOp::Text { y, .. } = op {
                    assert!(*y >= MARGIN_PT - 1.0 && *y <= height - MARGIN_PT, "y = {y}");
                }
            }
        }
    }

    #[test]
    fn empty_sections_are_not_drawn() {
        let doc = render_document(&note_with_items(1).project(today()));
        assert!(!doc.contains_text("NOTAS:"));
        assert!(!doc.contains_text("AUTORIZACIÓN:"));

        let mut note = note_with_items(1);
        note.set_header_field(DeliveryNoteField::Notes, "Frágil");
        let doc = render_document(&note.project(today()));
        assert!(doc.contains_text("NOTAS:"));
        assert!(doc.contains_text("Frágil"));
    }

    #[test]
    fn disclaimer_wraps_into_fine_print() {
        let receipt = WarehouseReceipt::new(&IssuerProfile::default(), today());
        let doc = render_document(&receipt.project(today()));
        let small = doc.pages.iter().flat_map(|p| &p.ops).filter(|op| {
            matches!(op, DrawOp::Text { size, .. } if *size == FINE_PRINT_SIZE)
        });
        assert!(small.count() > 3);
        assert!(doc.contains_text("No se han encontrado registros"));
    }

    #[test]
    fn wrap_respects_width_and_keeps_words() {
        let lines = wrap("uno dos tres cuatro", 9.0 * GLYPH_WIDTH * 8.0, 9.0);
        assert_eq!(lines, ["uno dos", "tres", "cuatro"]);
        assert_eq!(wrap("", 100.0, 9.0), [""]);
        assert_eq!(wrap("abcdefghij", 9.0 * GLYPH_WIDTH * 4.0, 9.0), ["abcd", "efgh", "ij"]);
    }
}
