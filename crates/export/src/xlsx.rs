//! xlsx encoding with `rust_xlsxwriter`.
//!
//! Numbers stay numeric in the sheet; their display formats mirror
//! [`Value::display`] so the workbook reads the same as the PDF.

use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet, XlsxError};
use tracing::debug;

use crate::encoder::WorkbookEncoder;
use crate::error::{ExportError, ExportResult};
use crate::payload::Value;
use crate::tabular::{Cell, CellStyle, TabularWorkbook};

const LABEL_FILL: u32 = 0xEEEEEE;
const MUTED_TEXT: u32 = 0x666666;

#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxBackend;

/// Excel number format matching a value's display text.
pub fn number_format(value: &Value) -> Option<String> {
    match value {
        Value::Integer(_) => Some("0".to_string()),
        Value::Currency(_) | Value::Deduction(_) => Some("$#,##0.00;-$#,##0.00".to_string()),
        Value::Amount(_) => Some("#,##0.00".to_string()),
        Value::Measure { places, unit, .. } => {
            let mut format = "0".to_string();
            if *places > 0 {
                format.push('.');
                format.push_str(&"0".repeat(*places as usize));
            }
            if let Some(unit) = unit {
                format.push_str(&format!(" \"{unit}\""));
            }
            Some(format)
        }
        Value::Text(_) | Value::Empty => None,
    }
}

fn cell_format(style: CellStyle, value: &Value) -> Format {
    let mut format = Format::new();
    format = match style {
        CellStyle::Normal => format,
        CellStyle::Bold => format.set_bold(),
        CellStyle::Title => format.set_bold().set_font_size(14),
        CellStyle::ColumnLabel => format
            .set_bold()
            .set_background_color(Color::RGB(LABEL_FILL))
            .set_border_bottom(FormatBorder::Thin),
        CellStyle::GrandTotal => format
            .set_bold()
            .set_font_size(12)
            .set_border_top(FormatBorder::Thin),
        CellStyle::Small => format.set_font_size(7).set_font_color(Color::RGB(MUTED_TEXT)),
    };
    if let Some(num_format) = number_format(value) {
        format = format.set_num_format(num_format);
    }
    format
}

fn write_cell(worksheet: &mut Worksheet, cell: &Cell) -> Result<(), XlsxError> {
    let format = cell_format(cell.style, &cell.value);
    match (&cell.value, cell.value.number()) {
        (Value::Text(text), _) => {
            worksheet.write_string_with_format(cell.row, cell.col, text, &format)?;
        }
        (_, Some(number)) => {
            worksheet.write_number_with_format(cell.row, cell.col, number, &format)?;
        }
        (_, None) => {}
    }
    Ok(())
}

fn build(workbook: &TabularWorkbook) -> Result<Vec<u8>, XlsxError> {
    let mut book = Workbook::new();
    let worksheet = book.add_worksheet();
    worksheet.set_name(&workbook.sheet_name)?;

    for (col, width) in workbook.column_widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }
    for cell in &workbook.cells {
        write_cell(worksheet, cell)?;
    }

    book.save_to_buffer()
}

impl WorkbookEncoder for XlsxBackend {
    fn encode(&self, workbook: &TabularWorkbook) -> ExportResult<Vec<u8>> {
        let bytes = build(workbook).map_err(|e| ExportError::Xlsx(e.to_string()))?;
        debug!(cells = workbook.cells.len(), bytes = bytes.len(), "xlsx encoded");
        Ok(bytes)
    }
}
