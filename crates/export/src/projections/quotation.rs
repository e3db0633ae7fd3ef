use chrono::NaiveDate;

use docforge_core::{AggregateRoot, money};
use docforge_sales::Quotation;

use crate::payload::{
    Align, Block, Column, DocumentKind, DocumentPayload, Field, Table, TableRole, TotalLine, Value,
};
use crate::projections::{Project, labelled, present};

impl Project for Quotation {
    fn project(&self, as_of: NaiveDate) -> DocumentPayload {
        let h = self.header();

        let client = [
            Some(h.client_name.clone()),
            labelled("", &h.client_company),
            labelled("", &h.client_address),
            labelled("Email: ", &h.client_email),
            labelled("Teléfono: ", &h.client_phone),
        ];

        let mut totals = vec![TotalLine::new("Subtotal:", Value::currency(self.subtotal()))];
        if h.discount_global > 0.0 {
            totals.push(TotalLine::new("Descuento:", Value::deduction(h.discount_global)));
        }
        if h.tax_rate > 0.0 {
            totals.push(TotalLine::new(
                format!("Impuestos ({}%):", money::format_rate(h.tax_rate)),
                Value::currency(self.tax_amount()),
            ));
        }
        if h.shipping_cost > 0.0 {
            totals.push(TotalLine::new("Envío:", Value::currency(h.shipping_cost)));
        }
        totals.push(TotalLine::grand("TOTAL:", Value::currency(self.total())));

        let mut blocks = vec![
            Block::Masthead {
                issuer: present([
                    h.company_name.as_str(),
                    h.company_address.as_str(),
                    h.company_phone.as_str(),
                    h.company_email.as_str(),
                ]),
                title: "COTIZACIÓN".to_string(),
                meta: vec![
                    Field::new("No.", &h.quote_number),
                    Field::new("Fecha:", &h.quote_date),
                    Field::new("Válida hasta:", &h.valid_until),
                ],
            },
            Block::Party {
                heading: Some("PARA:".to_string()),
                lines: client.into_iter().flatten().collect(),
            },
            Block::Table(Table {
                role: TableRole::Items,
                heading: None,
                columns: vec![
                    Column::new("Descripción", Align::Left, 3.0),
                    Column::new("Cant.", Align::Right, 0.6),
                    Column::new("Precio", Align::Right, 0.8),
                    Column::new("Desc.", Align::Right, 0.8),
                    Column::new("Total", Align::Right, 1.0),
                ],
                rows: self
                    .items()
                    .iter()
                    .map(|item| {
                        vec![
                            Value::text(&item.description),
                            Value::Integer(item.quantity),
                            Value::currency(item.unit_price),
                            if item.discount > 0.0 {
                                Value::deduction(item.discount)
                            } else {
                                Value::text("-")
                            },
                            Value::currency(item.amount()),
                        ]
                    })
                    .collect(),
            }),
            Block::Totals { lines: totals },
        ];

        blocks.extend(Block::section("NOTAS:", vec![h.notes.clone()]));
        blocks.extend(Block::section("TÉRMINOS DE PAGO:", vec![h.payment_terms.clone()]));
        blocks.extend(Block::section(
            "TÉRMINOS Y CONDICIONES:",
            vec![h.terms_conditions.clone()],
        ));

        DocumentPayload {
            kind: DocumentKind::Quotation,
            number: h.quote_number.clone(),
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
    use docforge_sales::{QuotationField, QuotationItemField};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 23).unwrap()
    }

    fn quote() -> Quotation {
        let mut quote = Quotation::new(&IssuerProfile::default(), today());
        quote.update_item(0, QuotationItemField::Quantity, "2");
        quote.update_item(0, QuotationItemField::UnitPrice, "500");
        quote
    }

    fn total_labels(payload: &DocumentPayload) -> Vec<&str> {
        payload.totals().iter().map(|l| l.label.as_str()).collect()
    }

    #[test]
    fn zero_adjustments_are_not_listed() {
        let payload = quote().project(today());
        assert_eq!(total_labels(&payload), ["Subtotal:", "TOTAL:"]);
        assert_eq!(payload.total("TOTAL:"), Some(&Value::Currency(1000.0)));
    }

    #[test]
    fn adjustments_appear_when_positive() {
        let mut quote = quote();
        quote.set_header_field(QuotationField::DiscountGlobal, "100");
        quote.set_header_field(QuotationField::TaxRate, "7.5");
        quote.set_header_field(QuotationField::ShippingCost, "20");

        let payload = quote.project(today());
        assert_eq!(
            total_labels(&payload),
            ["Subtotal:", "Descuento:", "Impuestos (7.5%):", "Envío:", "TOTAL:"]
        );
        assert_eq!(payload.total("Descuento:").map(Value::display).as_deref(), Some("-$100.00"));
        assert_eq!(payload.total("Impuestos (7.5%):"), Some(&Value::Currency(67.5)));
        assert_eq!(payload.total("TOTAL:"), Some(&Value::Currency(987.5)));
    }

    #[test]
    fn client_block_skips_blank_lines() {
        let mut quote = quote();
        quote.set_header_field(QuotationField::ClientName, "ACME");
        quote.set_header_field(QuotationField::ClientEmail, "compras@acme.test");

        let payload = quote.project(today());
        let lines = payload
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Party { lines, .. } => Some(lines.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(lines, ["ACME", "Email: compras@acme.test"]);
    }

    #[test]
    fn line_discount_shows_as_deduction() {
        let mut quote = quote();
        quote.update_item(0, QuotationItemField::Discount, "25");
        let payload = quote.project(today());
        let row = &payload.items_table().unwrap().rows[0];
        assert_eq!(row[3].display(), "-$25.00");
        assert_eq!(row[4].display(), "$975.00");
    }
}
