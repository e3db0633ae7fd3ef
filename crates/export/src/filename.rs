use uuid::Uuid;

use crate::format::ExportFormat;
use crate::payload::DocumentKind;

/// Six lowercase hex characters from a random v4 UUID.
pub fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..6].to_string()
}

/// Path separators, characters Windows rejects and control characters all
/// become `_`, as do dots opening the name or following a separator. The
/// result is a single path component.
fn file_safe(number: &str) -> String {
    let mut leading = true;
    number
        .chars()
        .map(|c| {
            let separator = matches!(c, '/' | '\\');
            let unsafe_char = separator
                || c.is_control()
                || matches!(c, ':' | '*' | '?' | '"' | '<' | '>' | '|')
                || (leading && c == '.');
            leading = separator || (leading && c == '.');
            if unsafe_char { '_' } else { c }
        })
        .collect()
}

/// `{Prefix}_{number}_{suffix}.{ext}`, e.g. `NotaDeEntrega_0042_a1b2c3.pdf`.
pub fn export_filename(
    kind: DocumentKind,
    number: &str,
    suffix: &str,
    format: ExportFormat,
) -> String {
    format!(
        "{}_{}_{}.{}",
        kind.file_prefix(),
        file_safe(number),
        suffix,
        format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_prefix_number_suffix() {
        assert_eq!(
            export_filename(DocumentKind::DeliveryNote, "0042", "a1b2c3", ExportFormat::Pdf),
            "NotaDeEntrega_0042_a1b2c3.pdf"
        );
        assert_eq!(
            export_filename(DocumentKind::Statement, "C-77", "ffffff", ExportFormat::Xlsx),
            "Statement_C-77_ffffff.xlsx"
        );
        assert_eq!(
            export_filename(DocumentKind::WarehouseReceipt, "", "000000", ExportFormat::Pdf),
            "ReciboAlmacen__000000.pdf"
        );
    }

    #[test]
    fn numbers_cannot_escape_the_file_name() {
        assert_eq!(
            export_filename(DocumentKind::DeliveryNote, "2025/001", "a1b2c3", ExportFormat::Pdf),
            "NotaDeEntrega_2025_001_a1b2c3.pdf"
        );
        let name = export_filename(
            DocumentKind::Quotation,
            "../..\\etc\n",
            "a1b2c3",
            ExportFormat::Xlsx,
        );
        assert_eq!(name, "Cotizacion_______etc__a1b2c3.xlsx");
        assert!(!name.contains('/') && !name.contains('\\') && !name.contains(".."));
        assert_eq!(file_safe("Q-1.2"), "Q-1.2");
    }

    #[test]
    fn suffix_is_six_hex_chars() {
        let suffix = random_suffix();
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
