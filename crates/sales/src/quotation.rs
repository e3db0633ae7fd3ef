use core::convert::Infallible;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use docforge_core::{
    Aggregate, AggregateRoot, DocumentCommand, DocumentEvent, DocumentId, Entity, IssuerProfile,
    ItemId, ItemList, calendar, coerce, document_fields, money,
};

pub const DOCUMENT: &str = "quotation";

/// Days a quotation stays valid by default.
pub const VALIDITY_DAYS: u64 = 30;

/// Quantity used for new lines and when quantity input cannot be read.
pub const DEFAULT_QUANTITY: i64 = 1;

document_fields! {
    /// Header fields of a quotation.
    pub enum QuotationField for "quotation" {
        CompanyName => "company_name",
        CompanyAddress => "company_address",
        CompanyPhone => "company_phone",
        CompanyEmail => "company_email",
        QuoteNumber => "quote_number",
        QuoteDate => "quote_date",
        ValidUntil => "valid_until",
        ClientName => "client_name",
        ClientCompany => "client_company",
        ClientAddress => "client_address",
        ClientEmail => "client_email",
        ClientPhone => "client_phone",
        Notes => "notes",
        TermsConditions => "terms_conditions",
        PaymentTerms => "payment_terms",
        TaxRate => "tax_rate",
        ShippingCost => "shipping_cost",
        DiscountGlobal => "discount_global",
    }
}

document_fields! {
    /// Editable fields of a quotation line.
    pub enum QuotationItemField for "quotation" {
        Description => "description",
        Quantity => "quantity",
        UnitPrice => "unit_price",
        Discount => "discount",
        Notes => "notes",
    }
}

/// Quotation line. The discount applies once to the whole line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationItem {
    pub id: ItemId,
    pub description: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub discount: f64,
    pub notes: String,
}

impl QuotationItem {
    pub fn new(id: ItemId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            quantity: DEFAULT_QUANTITY,
            unit_price: 0.0,
            discount: 0.0,
            notes: String::new(),
        }
    }

    /// `(quantity * unit_price) - discount`.
    pub fn amount(&self) -> f64 {
        money::finite_or_zero((self.quantity as f64 * self.unit_price) - self.discount)
    }

    fn apply_change(&mut self, change: &QuotationItemChange) {
        match change {
            QuotationItemChange::Description(v) => self.description = v.clone(),
            QuotationItemChange::Quantity(v) => self.quantity = *v,
            QuotationItemChange::UnitPrice(v) => self.unit_price = *v,
            QuotationItemChange::Discount(v) => self.discount = *v,
            QuotationItemChange::Notes(v) => self.notes = v.clone(),
        }
    }
}

impl Entity for QuotationItem {
    type Id = ItemId;

    fn id(&self) -> &ItemId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuotationItemChange {
    Description(String),
    Quantity(i64),
    UnitPrice(f64),
    Discount(f64),
    Notes(String),
}

impl QuotationItemField {
    /// Coerce raw form input. Quantity falls back to 1, prices to 0.
    pub fn coerce(self, raw: &str) -> QuotationItemChange {
        match self {
            Self::Description => QuotationItemChange::Description(raw.to_string()),
            Self::Notes => QuotationItemChange::Notes(raw.to_string()),
            Self::Quantity => {
                QuotationItemChange::Quantity(coerce::count(self.name(), raw, DEFAULT_QUANTITY))
            }
            Self::UnitPrice => {
                QuotationItemChange::UnitPrice(coerce::decimal(self.name(), raw, 0.0))
            }
            Self::Discount => QuotationItemChange::Discount(coerce::decimal(self.name(), raw, 0.0)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationHeader {
    pub company_name: String,
    pub company_address: String,
    pub company_phone: String,
    pub company_email: String,
    pub quote_number: String,
    pub quote_date: String,
    pub valid_until: String,
    pub client_name: String,
    pub client_company: String,
    pub client_address: String,
    pub client_email: String,
    pub client_phone: String,
    pub notes: String,
    pub terms_conditions: String,
    pub payment_terms: String,
    pub tax_rate: f64,
    pub shipping_cost: f64,
    pub discount_global: f64,
}

impl QuotationHeader {
    fn seeded(issuer: &IssuerProfile, today: NaiveDate) -> Self {
        let valid_until = today
            .checked_add_days(Days::new(VALIDITY_DAYS))
            .unwrap_or(today);
        Self {
            company_name: issuer.name.clone(),
            company_address: issuer.address.clone(),
            company_phone: issuer.phone.clone(),
            company_email: issuer.email.clone(),
            quote_number: String::new(),
            quote_date: calendar::format_iso(today),
            valid_until: calendar::format_iso(valid_until),
            client_name: String::new(),
            client_company: String::new(),
            client_address: String::new(),
            client_email: String::new(),
            client_phone: String::new(),
            notes: String::new(),
            terms_conditions: String::new(),
            payment_terms: String::new(),
            tax_rate: 0.0,
            shipping_cost: 0.0,
            discount_global: 0.0,
        }
    }

    fn text_mut(&mut self, field: QuotationField) -> Option<&mut String> {
        use QuotationField as F;
        let slot = match field {
            F::CompanyName => &mut self.company_name,
            F::CompanyAddress => &mut self.company_address,
            F::CompanyPhone => &mut self.company_phone,
            F::CompanyEmail => &mut self.company_email,
            F::QuoteNumber => &mut self.quote_number,
            F::QuoteDate => &mut self.quote_date,
            F::ValidUntil => &mut self.valid_until,
            F::ClientName => &mut self.client_name,
            F::ClientCompany => &mut self.client_company,
            F::ClientAddress => &mut self.client_address,
            F::ClientEmail => &mut self.client_email,
            F::ClientPhone => &mut self.client_phone,
            F::Notes => &mut self.notes,
            F::TermsConditions => &mut self.terms_conditions,
            F::PaymentTerms => &mut self.payment_terms,
            F::TaxRate | F::ShippingCost | F::DiscountGlobal => return None,
        };
        Some(slot)
    }

    fn apply_change(&mut self, change: &QuotationHeaderChange) {
        match change {
            QuotationHeaderChange::TaxRate(v) => self.tax_rate = *v,
            QuotationHeaderChange::ShippingCost(v) => self.shipping_cost = *v,
            QuotationHeaderChange::DiscountGlobal(v) => self.discount_global = *v,
            QuotationHeaderChange::Text { field, value } => {
                if let Some(slot) = self.text_mut(*field) {
                    *slot = value.clone();
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuotationHeaderChange {
    Text { field: QuotationField, value: String },
    TaxRate(f64),
    ShippingCost(f64),
    DiscountGlobal(f64),
}

impl QuotationField {
    pub fn coerce(self, raw: &str) -> QuotationHeaderChange {
        match self {
            Self::TaxRate => QuotationHeaderChange::TaxRate(coerce::decimal(self.name(), raw, 0.0)),
            Self::ShippingCost => {
                QuotationHeaderChange::ShippingCost(coerce::decimal(self.name(), raw, 0.0))
            }
            Self::DiscountGlobal => {
                QuotationHeaderChange::DiscountGlobal(coerce::decimal(self.name(), raw, 0.0))
            }
            field => QuotationHeaderChange::Text {
                field,
                value: raw.to_string(),
            },
        }
    }
}

pub type QuotationCommand = DocumentCommand<QuotationField, QuotationItemField>;
pub type QuotationEvent = DocumentEvent<QuotationItem, QuotationHeaderChange, QuotationItemChange>;

/// Aggregate root: Quotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Quotation {
    id: DocumentId,
    header: QuotationHeader,
    items: ItemList<QuotationItem>,
    version: u64,
}

impl Quotation {
    /// New quotation valid for 30 days, with one seed line.
    pub fn new(issuer: &IssuerProfile, today: NaiveDate) -> Self {
        let mut items = ItemList::new();
        items.push(QuotationItem::new(ItemId::new(), "Servicio de logística"));
        Self {
            id: DocumentId::new(),
            header: QuotationHeader::seeded(issuer, today),
            items,
            version: 0,
        }
    }

    pub fn header(&self) -> &QuotationHeader {
        &self.header
    }

    pub fn items(&self) -> &[QuotationItem] {
        self.items.as_slice()
    }

    pub fn subtotal(&self) -> f64 {
        money::finite_or_zero(self.items.iter().map(QuotationItem::amount).sum())
    }

    pub fn discount_total(&self) -> f64 {
        self.header.discount_global
    }

    pub fn subtotal_after_discount(&self) -> f64 {
        money::finite_or_zero(self.subtotal() - self.header.discount_global)
    }

    pub fn tax_amount(&self) -> f64 {
        money::finite_or_zero(self.subtotal_after_discount() * (self.header.tax_rate / 100.0))
    }

    pub fn total(&self) -> f64 {
        money::finite_or_zero(
            self.subtotal_after_discount() + self.tax_amount() + self.header.shipping_cost,
        )
    }

    pub fn add_item(&mut self) {
        let Ok(_) = self.execute(&DocumentCommand::AddItem);
    }

    pub fn remove_item(&mut self, index: usize) {
        let Ok(_) = self.execute(&DocumentCommand::RemoveItem { index });
    }

    pub fn update_item(&mut self, index: usize, field: QuotationItemField, value: &str) {
        let Ok(_) = self.execute(&DocumentCommand::UpdateItem {
            index,
            field,
            value: value.to_string(),
        });
    }

    pub fn set_header_field(&mut self, field: QuotationField, value: &str) {
        let Ok(_) = self.execute(&DocumentCommand::SetHeaderField {
            field,
            value: value.to_string(),
        });
    }
}

impl AggregateRoot for Quotation {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for Quotation {
    type Command = QuotationCommand;
    type Event = QuotationEvent;
    type Error = Infallible;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            DocumentEvent::ItemAdded(item) => self.items.push(item.clone()),
            DocumentEvent::ItemRemoved { item_id } => {
                self.items.remove(item_id);
            }
            DocumentEvent::ItemChanged { item_id, change } => {
                if let Some(item) = self.items.get_mut(item_id) {
                    item.apply_change(change);
                }
            }
            DocumentEvent::HeaderChanged(change) => self.header.apply_change(change),
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        let events = match command {
            DocumentCommand::AddItem => vec![DocumentEvent::ItemAdded(QuotationItem::new(
                ItemId::new(),
                "Nuevo servicio",
            ))],
            DocumentCommand::RemoveItem { index } => match self.items.id_at(*index) {
                Some(item_id) => vec![DocumentEvent::ItemRemoved { item_id }],
                None => {
                    debug!(
                        document = DOCUMENT,
                        index,
                        len = self.items.len(),
                        "remove ignored: index out of range"
                    );
                    Vec::new()
                }
            },
            DocumentCommand::UpdateItem {
                index,
                field,
                value,
            } => match self.items.id_at(*index) {
                Some(item_id) => vec![DocumentEvent::ItemChanged {
                    item_id,
                    change: field.coerce(value),
                }],
                None => {
                    debug!(
                        document = DOCUMENT,
                        index,
                        %field,
                        "update ignored: index out of range"
                    );
                    Vec::new()
                }
            },
            DocumentCommand::SetHeaderField { field, value } => {
                vec![DocumentEvent::HeaderChanged(field.coerce(value))]
            }
        };
        Ok(events)
    }
}
