use chrono::NaiveDate;

use docforge_core::{AggregateRoot, money};
use docforge_warehouse::{PackageDimension, WarehouseReceipt};

use crate::payload::{
    Align, Block, Column, DocumentKind, DocumentPayload, Field, Table, TableRole, Value,
};
use crate::projections::Project;

/// Placeholder shown in the archive section; receipts carry no attachments.
pub const NO_RECORDS: &str = "No se han encontrado registros";

fn side(value: f64) -> Value {
    if value > 0.0 {
        Value::measure(value, money::MEASURE_PLACES)
    } else {
        Value::text("X")
    }
}

fn dimension_row(d: &PackageDimension) -> Vec<Value> {
    vec![
        Value::Integer(d.bultos),
        side(d.largo),
        side(d.ancho),
        side(d.alto),
        Value::measure_in(d.pounds, money::MEASURE_PLACES, "lbs"),
        Value::measure(d.cubic_feet(), money::VOLUME_PLACES),
        if d.pt > 0.0 {
            Value::measure(d.pt, money::MEASURE_PLACES)
        } else {
            Value::Empty
        },
        Value::text(&d.referencia),
    ]
}

impl Project for WarehouseReceipt {
    fn project(&self, as_of: NaiveDate) -> DocumentPayload {
        let h = self.header();

        let mut blocks = vec![
            Block::Masthead {
                issuer: vec![h.company_name.clone()],
                title: "RECIBO DE ALMACÉN".to_string(),
                meta: vec![
                    Field::new("No.", &h.receipt_number),
                    Field::new("Ubicación:", &h.warehouse_location),
                ],
            },
            Block::Details {
                fields: vec![
                    Field::new("Fecha", &h.receipt_date),
                    Field::new("Oficina", &h.oficina),
                    Field::new("Remitente", &h.remitente),
                    Field::new("Referencia", &h.referencia),
                    Field::new("Destinatario", &h.destinatario),
                    Field::new("No. Pedido", &h.no_pedido),
                    Field::new("Entregado por", &h.entregado_por),
                    Field::new("Factura", &h.factura),
                    Field::new("Tracking", &h.tracking_number),
                    Field::new("Descripción", &h.descripcion),
                ],
            },
            Block::Table(Table {
                role: TableRole::Summary,
                heading: None,
                columns: vec![
                    Column::new("Bultos", Align::Center, 1.0),
                    Column::new("Peso Bruto", Align::Center, 1.5),
                    Column::new("Volumen", Align::Center, 1.5),
                    Column::new("Peso Tasable", Align::Center, 1.5),
                ],
                rows: vec![vec![
                    Value::Integer(self.total_bultos()),
                    Value::measure_in(self.calculated_peso_bruto(), 2, "pound(s)"),
                    Value::measure_in(
                        self.calculated_volumen(),
                        money::VOLUME_PLACES,
                        "cubic feet",
                    ),
                    Value::measure_in(h.peso_tasable, 2, "pound(s)"),
                ]],
            }),
            Block::Table(Table {
                role: TableRole::Items,
                heading: Some("Dimensiones de Paquetes".to_string()),
                columns: vec![
                    Column::new("Bultos", Align::Center, 0.6),
                    Column::new("Largo", Align::Center, 0.7),
                    Column::new("Ancho", Align::Center, 0.7),
                    Column::new("Alto", Align::Center, 0.7),
                    Column::new("Pounds", Align::Center, 0.9),
                    Column::new("Cubic Feet", Align::Center, 1.0),
                    Column::new("PT", Align::Center, 0.6),
                    Column::new("Referencia", Align::Center, 1.3),
                ],
                rows: self.dimensions().iter().map(dimension_row).collect(),
            }),
            Block::Section {
                heading: "Archivo".to_string(),
                lines: vec![NO_RECORDS.to_string()],
            },
        ];

        if !h.legal_disclaimer.trim().is_empty() {
            blocks.push(Block::FinePrint {
                text: h.legal_disclaimer.clone(),
            });
        }

        DocumentPayload {
            kind: DocumentKind::WarehouseReceipt,
            number: h.receipt_number.clone(),
            version: self.version(),
            as_of,
            blocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docforge_core::IssuerProfile;
    use docforge_warehouse::{PackageDimensionField, WarehouseReceiptField};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 23).unwrap()
    }

    #[test]
    fn rows_mark_missing_sides_and_blank_pt() {
        let mut receipt = WarehouseReceipt::new(&IssuerProfile::default(), today());
        receipt.add_item();
        receipt.update_item(0, PackageDimensionField::Largo, "12");
        receipt.update_item(0, PackageDimensionField::Alto, "6");
        receipt.update_item(0, PackageDimensionField::Pounds, "8.25");

        let payload = receipt.project(today());
        let row: Vec<String> = payload.items_table().unwrap().rows[0]
            .iter()
            .map(Value::display)
            .collect();
        assert_eq!(row, ["1", "12.0", "X", "6.0", "8.3 lbs", "0.000", "", ""]);
    }

    #[test]
    fn summary_uses_unit_suffixes() {
        let mut receipt = WarehouseReceipt::new(&IssuerProfile::default(), today());
        receipt.add_item();
        for (field, raw) in [
            (PackageDimensionField::Bultos, "3"),
            (PackageDimensionField::Largo, "12"),
            (PackageDimensionField::Ancho, "12"),
            (PackageDimensionField::Alto, "12"),
            (PackageDimensionField::Pounds, "40"),
        ] {
            receipt.update_item(0, field, raw);
        }
        receipt.set_header_field(WarehouseReceiptField::PesoTasable, "45");

        let payload = receipt.project(today());
        let summary: Vec<String> = payload
            .tables()
            .find(|t| t.role == TableRole::Summary)
            .unwrap()
            .rows[0]
            .iter()
            .map(Value::display)
            .collect();
        assert_eq!(summary, ["3", "40.00 pound(s)", "1.000 cubic feet", "45.00 pound(s)"]);
    }

    #[test]
    fn cleared_disclaimer_is_not_rendered() {
        let mut receipt = WarehouseReceipt::new(&IssuerProfile::default(), today());
        assert!(matches!(receipt.project(today()).blocks.last(), Some(Block::FinePrint { .. })));

        receipt.set_header_field(WarehouseReceiptField::LegalDisclaimer, " ");
        let payload = receipt.project(today());
        assert!(!payload.blocks.iter().any(|b| matches!(b, Block::FinePrint { .. })));
        assert_eq!(payload.section_headings().collect::<Vec<_>>(), ["Archivo"]);
    }
}
