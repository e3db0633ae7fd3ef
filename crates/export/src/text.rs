//! Plain-text quotation for pasting into an email.

use docforge_core::money::{format_currency, format_rate};
use docforge_sales::Quotation;

const RULE_WIDTH: usize = 60;

pub fn quotation_text(quote: &Quotation) -> String {
    let h = quote.header();
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    let mut lines = vec![
        heavy.clone(),
        format!("COTIZACIÓN #{}", h.quote_number),
        heavy.clone(),
        format!("Fecha: {}", h.quote_date),
        format!("Válida hasta: {}", h.valid_until),
        String::new(),
        "CLIENTE:".to_string(),
        format!("Nombre: {}", h.client_name),
    ];
    for (label, value) in [
        ("Empresa", &h.client_company),
        ("Dirección", &h.client_address),
        ("Email", &h.client_email),
        ("Teléfono", &h.client_phone),
    ] {
        if !value.is_empty() {
            lines.push(format!("{label}: {value}"));
        }
    }

    lines.extend([String::new(), "DETALLES:".to_string(), light.clone()]);
    for (n, item) in quote.items().iter().enumerate() {
        lines.push(format!("{}. {}", n + 1, item.description));
        lines.push(format!(
            "   Cantidad: {} x {} = {}",
            item.quantity,
            format_currency(item.unit_price),
            format_currency(item.amount())
        ));
        if item.discount > 0.0 {
            lines.push(format!("   Descuento: -{}", format_currency(item.discount)));
        }
        if !item.notes.is_empty() {
            lines.push(format!("   Nota: {}", item.notes));
        }
    }

    lines.push(light);
    lines.push(format!("Subtotal: {}", format_currency(quote.subtotal())));
    if h.discount_global > 0.0 {
        lines.push(format!("Descuento Global: -{}", format_currency(h.discount_global)));
    }
    if h.tax_rate > 0.0 {
        lines.push(format!(
            "Impuestos ({}%): {}",
            format_rate(h.tax_rate),
            format_currency(quote.tax_amount())
        ));
    }
    if h.shipping_cost > 0.0 {
        lines.push(format!("Envío: {}", format_currency(h.shipping_cost)));
    }
    lines.extend([String::new(), format!("TOTAL: {}", format_currency(quote.total())), heavy]);

    for (heading, body) in [
        ("NOTAS:", &h.notes),
        ("TÉRMINOS DE PAGO:", &h.payment_terms),
        ("TÉRMINOS Y CONDICIONES:", &h.terms_conditions),
    ] {
        if !body.is_empty() {
            lines.extend([String::new(), heading.to_string(), body.clone()]);
        }
    }

    lines.extend([
        String::new(),
        "Gracias por su confianza.".to_string(),
        h.company_name.clone(),
        h.company_phone.clone(),
    ]);
    lines.join("\n")
}
