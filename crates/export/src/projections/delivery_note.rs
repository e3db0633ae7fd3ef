use chrono::NaiveDate;

use docforge_core::{AggregateRoot, money};
use docforge_invoicing::DeliveryNote;

use crate::payload::{
    Align, Block, Column, DocumentKind, DocumentPayload, Field, Table, TableRole, TotalLine, Value,
};
use crate::projections::{Project, labelled};

impl Project for DeliveryNote {
    fn project(&self, as_of: NaiveDate) -> DocumentPayload {
        let h = self.header();
        let mut blocks = vec![
            Block::Masthead {
                issuer: vec![
                    h.from_name.clone(),
                    h.from_address.clone(),
                    h.from_details.clone(),
                    format!("RIF/Cédula: {}", h.from_tax_id),
                    h.from_email.clone(),
                    h.from_phone.clone(),
                ],
                title: "NOTA DE ENTREGA".to_string(),
                meta: vec![
                    Field::new("No:", &h.invoice_number),
                    Field::new("Fecha:", &h.invoice_date),
                    Field::new("Vence:", &h.due_date),
                ],
            },
            Block::Party {
                heading: Some("ENTREGAR A:".to_string()),
                lines: vec![
                    h.to_name.clone(),
                    h.to_company.clone(),
                    h.to_address.clone(),
                    h.to_details.clone(),
                    format!("RIF/Cédula: {}", h.to_tax_id),
                ],
            },
            Block::Table(Table {
                role: TableRole::Items,
                heading: None,
                columns: vec![
                    Column::new("Código", Align::Center, 0.8),
                    Column::new("Descripción", Align::Left, 2.5),
                    Column::new("Cant.", Align::Right, 0.8),
                    Column::new("Precio", Align::Right, 1.0),
                    Column::new("Desc.", Align::Right, 0.8),
                    Column::new("Total", Align::Right, 1.2),
                ],
                rows: self
                    .items()
                    .iter()
                    .map(|item| {
                        vec![
                            if item.code.is_empty() {
                                Value::text("-")
                            } else {
                                Value::text(&item.code)
                            },
                            Value::text(&item.description),
                            Value::Integer(item.quantity),
                            Value::currency(item.unit_price),
                            if item.discount > 0.0 {
                                Value::currency(item.discount)
                            } else {
                                Value::text("-")
                            },
                            Value::currency(item.amount()),
                        ]
                    })
                    .collect(),
            }),
            Block::Totals {
                lines: vec![
                    TotalLine::new("Subtotal:", Value::currency(self.subtotal())),
                    TotalLine::new(
                        format!("Impuestos ({}%):", money::format_rate(h.tax_rate)),
                        Value::currency(self.tax_amount()),
                    ),
                    TotalLine::grand("Total:", Value::currency(self.total())),
                ],
            },
        ];

        if !h.payment_method.trim().is_empty() {
            let payment = [
                labelled("Método: ", &h.payment_method),
                labelled("Banco: ", &h.bank_name),
                labelled("Cuenta: ", &h.bank_account),
            ];
            blocks.extend(Block::section(
                "INFORMACIÓN DE PAGO:",
                payment.into_iter().flatten().collect(),
            ));
        }
        blocks.extend(Block::section(
            "TÉRMINOS Y CONDICIONES:",
            vec![h.terms_conditions.clone()],
        ));
        blocks.extend(Block::section("NOTAS:", vec![h.notes.clone()]));
        if !h.authorized_by.trim().is_empty() {
            blocks.extend(Block::section(
                "AUTORIZACIÓN:",
                vec![
                    format!("Autorizado por: {}", h.authorized_by),
                    "Firma: ______________________".to_string(),
                ],
            ));
        }

        DocumentPayload {
            kind: DocumentKind::DeliveryNote,
            number: h.invoice_number.clone(),
            version: self.version(),
            as_of,
            blocks,
        }
    }
}
