//! Export-ready document snapshot.
//!
//! A [`DocumentPayload`] is what the preview shows and what both file
//! renderers consume. Every number in it is already rounded and tagged with
//! how it is displayed, so the PDF, the workbook and the preview cannot
//! disagree.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use docforge_core::money;

/// Which document a payload was projected from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    DeliveryNote,
    Quotation,
    Statement,
    WarehouseReceipt,
}

impl DocumentKind {
    /// Leading part of export file names.
    pub const fn file_prefix(self) -> &'static str {
        match self {
            Self::DeliveryNote => "NotaDeEntrega",
            Self::Quotation => "Cotizacion",
            Self::Statement => "Statement",
            Self::WarehouseReceipt => "ReciboAlmacen",
        }
    }

    /// Worksheet name in the xlsx export.
    pub const fn sheet_name(self) -> &'static str {
        match self {
            Self::DeliveryNote => "Nota de entrega",
            Self::Quotation => "Cotización",
            Self::Statement => "Estado de Cuenta",
            Self::WarehouseReceipt => "Recibo de Almacén",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::DeliveryNote => "delivery_note",
            Self::Quotation => "quotation",
            Self::Statement => "statement",
            Self::WarehouseReceipt => "warehouse_receipt",
        }
    }
}

/// A displayable cell or total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Text(String),
    Integer(i64),
    /// `$1,234.00`
    Currency(f64),
    /// Subtracted amount, `-$50.00`.
    Deduction(f64),
    /// Grouped, no symbol: `1,234.00`.
    Amount(f64),
    /// Fixed decimals with an optional unit: `12.5 lbs`, `0.579`.
    Measure {
        value: f64,
        places: u32,
        unit: Option<String>,
    },
    Empty,
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn currency(value: f64) -> Self {
        Self::Currency(money::round_currency(value))
    }

    pub fn deduction(value: f64) -> Self {
        Self::Deduction(money::round_currency(value))
    }

    pub fn amount(value: f64) -> Self {
        Self::Amount(money::round_currency(value))
    }

    pub fn measure(value: f64, places: u32) -> Self {
        Self::Measure {
            value: money::round_to(value, places),
            places,
            unit: None,
        }
    }

    pub fn measure_in(value: f64, places: u32, unit: &str) -> Self {
        Self::Measure {
            value: money::round_to(value, places),
            places,
            unit: Some(unit.to_string()),
        }
    }

    /// Numeric content, if any.
    pub fn number(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Currency(v) | Self::Amount(v) => Some(*v),
            Self::Deduction(v) => Some(-*v),
            Self::Measure { value, .. } => Some(*value),
            Self::Text(_) | Self::Empty => None,
        }
    }

    /// Text shown to the user. Shared by every renderer.
    pub fn display(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Integer(v) => v.to_string(),
            Self::Currency(v) => money::format_currency(*v),
            Self::Deduction(v) => format!("-{}", money::format_currency(*v)),
            Self::Amount(v) => money::format_amount(*v),
            Self::Measure {
                value,
                places,
                unit,
            } => {
                let number = format!("{:.*}", *places as usize, value);
                match unit {
                    Some(unit) => format!("{number} {unit}"),
                    None => number,
                }
            }
            Self::Empty => String::new(),
        }
    }
}

/// Label/value pair: `No: 0001`, `Oficina  Caracas`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub label: String,
    pub value: String,
}

impl Field {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub label: String,
    pub align: Align,
    /// Relative width; renderers scale it to the page or to character units.
    pub weight: f32,
}

impl Column {
    pub fn new(label: &str, align: Align, weight: f32) -> Self {
        Self {
            label: label.to_string(),
            align,
            weight,
        }
    }
}

/// `Items` tables flow across pages; `Summary` tables are kept whole.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableRole {
    Items,
    Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub role: TableRole,
    pub heading: Option<String>,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalLine {
    pub label: String,
    pub value: Value,
    /// Grand total line, drawn bold and larger.
    pub emphasis: bool,
}

impl TotalLine {
    pub fn new(label: impl Into<String>, value: Value) -> Self {
        Self {
            label: label.into(),
            value,
            emphasis: false,
        }
    }

    pub fn grand(label: impl Into<String>, value: Value) -> Self {
        Self {
            emphasis: true,
            ..Self::new(label, value)
        }
    }
}

/// One vertical segment of a document, rendered in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "block", rename_all = "snake_case")]
pub enum Block {
    /// Issuer identity on the left, title and reference fields on the right.
    Masthead {
        issuer: Vec<String>,
        title: String,
        meta: Vec<Field>,
    },
    /// Recipient address block.
    Party {
        heading: Option<String>,
        lines: Vec<String>,
    },
    /// Label/value grid.
    Details { fields: Vec<Field> },
    Paragraph { text: String },
    Table(Table),
    Totals { lines: Vec<TotalLine> },
    /// Titled free-text section.
    Section { heading: String, lines: Vec<String> },
    /// Small print at the foot of the document.
    FinePrint { text: String },
}

impl Block {
    /// Section block, or `None` when there is nothing to show.
    pub fn section(heading: &str, lines: Vec<String>) -> Option<Self> {
        if lines.iter().all(|line| line.trim().is_empty()) {
            return None;
        }
        Some(Self::Section {
            heading: heading.to_string(),
            lines,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPayload {
    pub kind: DocumentKind,
    /// Reference used in the file name (invoice number, account number, ...).
    pub number: String,
    /// Aggregate version the snapshot was taken at.
    pub version: u64,
    pub as_of: NaiveDate,
    pub blocks: Vec<Block>,
}

impl DocumentPayload {
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }

    pub fn items_table(&self) -> Option<&Table> {
        self.tables().find(|table| table.role == TableRole::Items)
    }

    pub fn totals(&self) -> &[TotalLine] {
        self.blocks
            .iter()
            .find_map(|block| match block {
                Block::Totals { lines } => Some(lines.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Value of the total line labelled `label`.
    pub fn total(&self, label: &str) -> Option<&Value> {
        self.totals()
            .iter()
            .find(|line| line.label == label)
            .map(|line| &line.value)
    }

    pub fn section_headings(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Section { heading, .. } => Some(heading.as_str()),
            _ => None,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_display_in_locale_formats() {
        assert_eq!(Value::currency(2378.0).display(), "$2,378.00");
        assert_eq!(Value::deduction(50.0).display(), "-$50.00");
        assert_eq!(Value::amount(1154.0).display(), "1,154.00");
        assert_eq!(Value::Integer(10).display(), "10");
        assert_eq!(Value::measure(0.5787, 3).display(), "0.579");
        assert_eq!(Value::measure_in(10.55, 1, "lbs").display(), "10.6 lbs");
        assert_eq!(Value::Empty.display(), "");
    }

    #[test]
    fn constructors_round_at_the_boundary() {
        assert_eq!(Value::currency(0.125), Value::Currency(0.13));
        assert_eq!(Value::deduction(5.0).number(), Some(-5.0));
    }

    #[test]
    fn blank_sections_are_dropped() {
        assert!(Block::section("NOTAS:", vec![String::new()]).is_none());
        assert!(Block::section("NOTAS:", vec!["  ".to_string()]).is_none());
        assert!(Block::section("NOTAS:", vec!["Frágil".to_string()]).is_some());
    }
}
