use chrono::NaiveDate;

use docforge_core::AggregateRoot;
use docforge_statements::Statement;

use crate::payload::{
    Align, Block, Column, DocumentKind, DocumentPayload, Field, Table, TableRole, Value,
};
use crate::projections::{Project, present};

impl Project for Statement {
    fn project(&self, as_of: NaiveDate) -> DocumentPayload {
        let h = self.header();
        let aging = self.aging_buckets(as_of);

        let blocks = vec![
            Block::Masthead {
                issuer: vec![
                    h.provider_name.clone(),
                    h.provider_address.clone(),
                    h.provider_city_state_zip.clone(),
                    format!("Tel: {}", h.provider_phone),
                ],
                title: "ESTADO DE CUENTA".to_string(),
                meta: Vec::new(),
            },
            Block::Party {
                heading: None,
                lines: present([
                    h.client_name.clone(),
                    h.client_address.clone(),
                    format!("{} {}", h.client_city, h.client_state),
                    h.client_country.clone(),
                ]),
            },
            Block::Details {
                fields: vec![
                    Field::new("NÚMERO DE CUENTA", &h.account_number),
                    Field::new("TÉRMINOS", &h.terms),
                    Field::new("FECHA ESTADO", &h.statement_date),
                ],
            },
            Block::Paragraph {
                text: format!(
                    "A CONTINUACION LE MOSTRAMOS UNA LISTA DE NOTAS DE ENTREGA PENDIENTES DE PAGO A {}",
                    h.statement_date
                ),
            },
            Block::Table(Table {
                role: TableRole::Items,
                heading: None,
                columns: vec![
                    Column::new("Fecha", Align::Left, 1.0),
                    Column::new("Nota/Factura", Align::Left, 0.9),
                    Column::new("Cuenta", Align::Left, 1.0),
                    Column::new("Descripción", Align::Left, 2.1),
                    Column::new("Cantidad", Align::Right, 0.8),
                    Column::new("Pagado", Align::Right, 0.8),
                    Column::new("Debido", Align::Right, 0.9),
                ],
                rows: self
                    .transactions()
                    .iter()
                    .map(|t| {
                        vec![
                            Value::text(&t.date),
                            Value::text(&t.invoice_no),
                            Value::text(&t.reference),
                            Value::text(&t.description),
                            Value::amount(t.amount),
                            Value::amount(t.paid),
                            Value::amount(t.balance()),
                        ]
                    })
                    .collect(),
            }),
            Block::Table(Table {
                role: TableRole::Summary,
                heading: None,
                columns: vec![
                    Column::new("Currency", Align::Left, 1.0),
                    Column::new("-30", Align::Right, 1.0),
                    Column::new("+30", Align::Right, 1.0),
                    Column::new("+60", Align::Right, 1.0),
                    Column::new("+90", Align::Right, 1.0),
                    Column::new("Total Debido", Align::Right, 1.5),
                ],
                rows: vec![vec![
                    Value::text("USD"),
                    Value::amount(aging.current),
                    Value::amount(aging.days_30),
                    Value::amount(aging.days_60),
                    Value::amount(aging.days_90),
                    Value::amount(self.total_due(as_of)),
                ]],
            }),
        ];

        DocumentPayload {
            kind: DocumentKind::Statement,
            number: h.account_number.clone(),
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
    use docforge_statements::{StatementField, TransactionField};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 23).unwrap()
    }

    fn aging_row(payload: &DocumentPayload) -> Vec<String> {
        payload
            .tables()
            .find(|t| t.role == TableRole::Summary)
            .unwrap()
            .rows[0]
            .iter()
            .map(Value::display)
            .collect()
    }

    #[test]
    fn aging_row_reflects_bucket_split() {
        let mut statement = Statement::new(&IssuerProfile::default(), today());
        statement.set_header_field(StatementField::AccountNumber, "C-77");
        statement.add_item();
        statement.update_item(0, TransactionField::Date, "2025-10-23");
        statement.update_item(0, TransactionField::Amount, "154");
        statement.add_item();
        statement.update_item(1, TransactionField::Amount, "1000");
        statement.update_item(1, TransactionField::Paid, "250.5");

        let payload = statement.project(today());
        assert_eq!(payload.number, "C-77");
        assert_eq!(aging_row(&payload), ["USD", "749.50", "154.00", "0.00", "0.00", "903.50"]);

        let debido: Vec<String> = payload
            .items_table()
            .unwrap()
            .rows
            .iter()
            .map(|row| row[6].display())
            .collect();
        assert_eq!(debido, ["154.00", "749.50"]);
    }

    #[test]
    fn empty_statement_still_has_aging_row() {
        let statement = Statement::new(&IssuerProfile::default(), today());
        let payload = statement.project(today());
        assert_eq!(aging_row(&payload), ["USD", "0.00", "0.00", "0.00", "0.00", "0.00"]);
        assert!(payload.items_table().unwrap().rows.is_empty());
    }
}
