use core::convert::Infallible;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use docforge_core::{
    Aggregate, AggregateRoot, DocumentCommand, DocumentEvent, DocumentId, Entity, IssuerProfile,
    ItemId, ItemList, calendar, coerce, document_fields, money,
};

/// Document name used in logs and field errors.
pub const DOCUMENT: &str = "delivery_note";

document_fields! {
    /// Header fields of a delivery note.
    pub enum DeliveryNoteField for "delivery_note" {
        FromName => "from_name",
        FromAddress => "from_address",
        FromDetails => "from_details",
        FromEmail => "from_email",
        FromPhone => "from_phone",
        FromTaxId => "from_tax_id",
        ToName => "to_name",
        ToCompany => "to_company",
        ToAddress => "to_address",
        ToDetails => "to_details",
        ToTaxId => "to_tax_id",
        InvoiceNumber => "invoice_number",
        InvoiceDate => "invoice_date",
        DueDate => "due_date",
        PaymentMethod => "payment_method",
        BankAccount => "bank_account",
        BankName => "bank_name",
        TermsConditions => "terms_conditions",
        Notes => "notes",
        AuthorizedBy => "authorized_by",
        /// Percentage, numeric.
        TaxRate => "tax_rate",
    }
}

document_fields! {
    /// Editable fields of a delivery note line.
    pub enum DeliveryNoteItemField for "delivery_note" {
        Code => "code",
        Description => "description",
        Quantity => "quantity",
        UnitPrice => "unit_price",
        Discount => "discount",
    }
}

/// Delivery note line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryNoteItem {
    pub id: ItemId,
    /// Código/SKU.
    pub code: String,
    pub description: String,
    pub quantity: i64,
    pub unit_price: f64,
    /// Discount per unit.
    pub discount: f64,
}

impl DeliveryNoteItem {
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            code: String::new(),
            description: "Nuevo Item".to_string(),
            quantity: 1,
            unit_price: 0.0,
            discount: 0.0,
        }
    }

    /// `quantity * (unit_price - discount)`.
    pub fn amount(&self) -> f64 {
        money::finite_or_zero(self.quantity as f64 * (self.unit_price - self.discount))
    }

    fn apply_change(&mut self, change: &DeliveryNoteItemChange) {
        match change {
            DeliveryNoteItemChange::Code(v) => self.code = v.clone(),
            DeliveryNoteItemChange::Description(v) => self.description = v.clone(),
            DeliveryNoteItemChange::Quantity(v) => self.quantity = *v,
            DeliveryNoteItemChange::UnitPrice(v) => self.unit_price = *v,
            DeliveryNoteItemChange::Discount(v) => self.discount = *v,
        }
    }
}

impl Entity for DeliveryNoteItem {
    type Id = ItemId;

    fn id(&self) -> &ItemId {
        &self.id
    }
}

/// Typed, already-coerced change to one line field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeliveryNoteItemChange {
    Code(String),
    Description(String),
    Quantity(i64),
    UnitPrice(f64),
    Discount(f64),
}

impl DeliveryNoteItemField {
    /// Coerce raw form input for this field. Numeric fields fall back to 0.
    pub fn coerce(self, raw: &str) -> DeliveryNoteItemChange {
        match self {
            Self::Code => DeliveryNoteItemChange::Code(raw.to_string()),
            Self::Description => DeliveryNoteItemChange::Description(raw.to_string()),
            Self::Quantity => DeliveryNoteItemChange::Quantity(coerce::count(self.name(), raw, 0)),
            Self::UnitPrice => {
                DeliveryNoteItemChange::UnitPrice(coerce::decimal(self.name(), raw, 0.0))
            }
            Self::Discount => {
                DeliveryNoteItemChange::Discount(coerce::decimal(self.name(), raw, 0.0))
            }
        }
    }
}

/// Header of a delivery note. Text fields are stored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryNoteHeader {
    pub from_name: String,
    pub from_address: String,
    pub from_details: String,
    pub from_email: String,
    pub from_phone: String,
    pub from_tax_id: String,
    pub to_name: String,
    pub to_company: String,
    pub to_address: String,
    pub to_details: String,
    pub to_tax_id: String,
    pub invoice_number: String,
    pub invoice_date: String,
    pub due_date: String,
    pub payment_method: String,
    pub bank_account: String,
    pub bank_name: String,
    pub terms_conditions: String,
    pub notes: String,
    pub authorized_by: String,
    pub tax_rate: f64,
}

impl DeliveryNoteHeader {
    fn seeded(issuer: &IssuerProfile, today: NaiveDate) -> Self {
        let today = calendar::format_iso(today);
        Self {
            from_name: issuer.name.clone(),
            from_address: issuer.address.clone(),
            from_details: issuer.details.clone(),
            from_email: issuer.email.clone(),
            from_phone: issuer.phone.clone(),
            from_tax_id: issuer.tax_id.clone(),
            to_name: String::new(),
            to_company: String::new(),
            to_address: String::new(),
            to_details: String::new(),
            to_tax_id: String::new(),
            invoice_number: String::new(),
            invoice_date: today.clone(),
            due_date: today,
            payment_method: String::new(),
            bank_account: String::new(),
            bank_name: String::new(),
            terms_conditions: String::new(),
            notes: String::new(),
            authorized_by: String::new(),
            tax_rate: 0.0,
        }
    }

    fn text_mut(&mut self, field: DeliveryNoteField) -> Option<&mut String> {
        use DeliveryNoteField as F;
        let slot = match field {
            F::FromName => &mut self.from_name,
            F::FromAddress => &mut self.from_address,
            F::FromDetails => &mut self.from_details,
            F::FromEmail => &mut self.from_email,
            F::FromPhone => &mut self.from_phone,
            F::FromTaxId => &mut self.from_tax_id,
            F::ToName => &mut self.to_name,
            F::ToCompany => &mut self.to_company,
            F::ToAddress => &mut self.to_address,
            F::ToDetails => &mut self.to_details,
            F::ToTaxId => &mut self.to_tax_id,
            F::InvoiceNumber => &mut self.invoice_number,
            F::InvoiceDate => &mut self.invoice_date,
            F::DueDate => &mut self.due_date,
            F::PaymentMethod => &mut self.payment_method,
            F::BankAccount => &mut self.bank_account,
            F::BankName => &mut self.bank_name,
            F::TermsConditions => &mut self.terms_conditions,
            F::Notes => &mut self.notes,
            F::AuthorizedBy => &mut self.authorized_by,
            F::TaxRate => return None,
        };
        Some(slot)
    }

    fn apply_change(&mut self, change: &DeliveryNoteHeaderChange) {
        match change {
            DeliveryNoteHeaderChange::TaxRate(rate) => self.tax_rate = *rate,
            DeliveryNoteHeaderChange::Text { field, value } => {
                if let Some(slot) = self.text_mut(*field) {
                    *slot = value.clone();
                }
            }
        }
    }
}

/// Typed, already-coerced change to one header field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeliveryNoteHeaderChange {
    Text {
        field: DeliveryNoteField,
        value: String,
    },
    TaxRate(f64),
}

impl DeliveryNoteField {
    pub fn coerce(self, raw: &str) -> DeliveryNoteHeaderChange {
        match self {
            Self::TaxRate => {
                DeliveryNoteHeaderChange::TaxRate(coerce::decimal(self.name(), raw, 0.0))
            }
            field => DeliveryNoteHeaderChange::Text {
                field,
                value: raw.to_string(),
            },
        }
    }
}

pub type DeliveryNoteCommand = DocumentCommand<DeliveryNoteField, DeliveryNoteItemField>;
pub type DeliveryNoteEvent =
    DocumentEvent<DeliveryNoteItem, DeliveryNoteHeaderChange, DeliveryNoteItemChange>;

/// Aggregate root: DeliveryNote ("Nota de entrega").
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryNote {
    id: DocumentId,
    header: DeliveryNoteHeader,
    items: ItemList<DeliveryNoteItem>,
    version: u64,
}

impl DeliveryNote {
    /// New document with issuer details and both dates seeded to `today`, no lines.
    pub fn new(issuer: &IssuerProfile, today: NaiveDate) -> Self {
        Self {
            id: DocumentId::new(),
            header: DeliveryNoteHeader::seeded(issuer, today),
            items: ItemList::new(),
            version: 0,
        }
    }

    pub fn header(&self) -> &DeliveryNoteHeader {
        &self.header
    }

    pub fn items(&self) -> &[DeliveryNoteItem] {
        self.items.as_slice()
    }

    pub fn subtotal(&self) -> f64 {
        money::finite_or_zero(self.items.iter().map(DeliveryNoteItem::amount).sum())
    }

    pub fn tax_amount(&self) -> f64 {
        money::finite_or_zero(self.subtotal() * (self.header.tax_rate / 100.0))
    }

    pub fn total(&self) -> f64 {
        money::finite_or_zero(self.subtotal() + self.tax_amount())
    }

    pub fn add_item(&mut self) {
        let Ok(_) = self.execute(&DocumentCommand::AddItem);
    }

    pub fn remove_item(&mut self, index: usize) {
        let Ok(_) = self.execute(&DocumentCommand::RemoveItem { index });
    }

    pub fn update_item(&mut self, index: usize, field: DeliveryNoteItemField, value: &str) {
        let Ok(_) = self.execute(&DocumentCommand::UpdateItem {
            index,
            field,
            value: value.to_string(),
        });
    }

    pub fn set_header_field(&mut self, field: DeliveryNoteField, value: &str) {
        let Ok(_) = self.execute(&DocumentCommand::SetHeaderField {
            field,
            value: value.to_string(),
        });
    }
}

impl AggregateRoot for DeliveryNote {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for DeliveryNote {
    type Command = DeliveryNoteCommand;
    type Event = DeliveryNoteEvent;
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
            DocumentCommand::AddItem => {
                vec![DocumentEvent::ItemAdded(DeliveryNoteItem::new(ItemId::new()))]
            }
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

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 23).unwrap()
    }

    fn empty_note() -> DeliveryNote {
        DeliveryNote::new(&IssuerProfile::default(), today())
    }

    fn note_with_lines(lines: &[(&str, &str, &str)]) -> DeliveryNote {
        let mut note = empty_note();
        for (i, (qty, price, discount)) in lines.iter().enumerate() {
            note.add_item();
            note.update_item(i, DeliveryNoteItemField::Quantity, qty);
            note.update_item(i, DeliveryNoteItemField::UnitPrice, price);
            note.update_item(i, DeliveryNoteItemField::Discount, discount);
        }
        note
    }

    #[test]
    fn overflowing_line_amount_reads_as_zero() {
        let note = note_with_lines(&[("2", "1e308", "-1e308"), ("1", "5", "0")]);
        assert_eq!(note.items()[0].amount(), 0.0);
        assert_eq!(note.subtotal(), 5.0);
        assert!(note.total().is_finite());
    }

    #[test]
    fn new_note_is_seeded_from_issuer_and_today() {
        let note = empty_note();
        assert_eq!(note.header().from_name, "Nosglobal Logistic");
        assert_eq!(note.header().invoice_date, "2025-11-23");
        assert_eq!(note.header().due_date, "2025-11-23");
        assert!(note.items().is_empty());
        assert_eq!(note.version(), 0);
    }

    #[test]
    fn add_item_appends_defaults_with_fresh_ids() {
        let mut note = empty_note();
        note.add_item();
        note.add_item();

        let items = note.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].description, "Nuevo Item");
        assert_eq!(items[0].quantity, 1);
        assert_eq!(items[0].amount(), 0.0);
        assert_ne!(items[0].id, items[1].id);
        assert_eq!(note.version(), 2);
    }

    #[test]
    fn amount_subtracts_unit_discount_before_multiplying() {
        let note = note_with_lines(&[("3", "10", "2")]);
        assert_eq!(note.items()[0].amount(), 24.0);
    }

    #[test]
    fn totals_match_reference_scenario() {
        let mut note = note_with_lines(&[("10", "85", "0"), ("1", "1200", "0")]);
        note.set_header_field(DeliveryNoteField::TaxRate, "16.0");

        assert_eq!(note.subtotal(), 2050.0);
        assert!((note.tax_amount() - 328.0).abs() < 1e-9);
        assert!((note.total() - 2378.0).abs() < 1e-9);
    }

    #[test]
    fn malformed_numeric_input_falls_back_to_zero() {
        let mut note = note_with_lines(&[("4", "10", "1")]);
        note.update_item(0, DeliveryNoteItemField::UnitPrice, "abc");
        assert_eq!(note.items()[0].unit_price, 0.0);
        note.update_item(0, DeliveryNoteItemField::Quantity, "");
        assert_eq!(note.items()[0].quantity, 0);
        note.set_header_field(DeliveryNoteField::TaxRate, "sixteen");
        assert_eq!(note.header().tax_rate, 0.0);

        // Still fully usable afterwards.
        note.update_item(0, DeliveryNoteItemField::Quantity, "2");
        note.update_item(0, DeliveryNoteItemField::UnitPrice, "5");
        note.add_item();
        assert_eq!(note.items().len(), 2);
        assert_eq!(note.subtotal(), 2.0 * (5.0 - 1.0));
    }

    #[test]
    fn text_fields_are_stored_verbatim() {
        let mut note = note_with_lines(&[("1", "1", "0")]);
        note.update_item(0, DeliveryNoteItemField::Description, "<b>Caja & 'cinta'</b>");
        note.set_header_field(DeliveryNoteField::Notes, "  entregar <antes> ");

        assert_eq!(note.items()[0].description, "<b>Caja & 'cinta'</b>");
        assert_eq!(note.header().notes, "  entregar <antes> ");
    }

    #[test]
    fn remove_first_of_three_preserves_order() {
        let mut note = note_with_lines(&[("1", "1", "0"), ("2", "1", "0"), ("3", "1", "0")]);
        let second = note.items()[1].id;
        let third = note.items()[2].id;

        note.remove_item(0);

        let ids: Vec<ItemId> = note.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![second, third]);
    }

    #[test]
    fn out_of_range_mutations_are_no_ops() {
        let mut note = note_with_lines(&[("1", "1", "0"), ("2", "1", "0")]);
        let before = note.clone();

        note.remove_item(5);
        note.update_item(2, DeliveryNoteItemField::Quantity, "9");

        assert_eq!(note, before);
        let events = note.handle(&DocumentCommand::RemoveItem { index: 5 }).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn removing_everything_zeroes_subtotal() {
        let mut note = note_with_lines(&[("1", "10", "0"), ("2", "20", "0")]);
        note.remove_item(1);
        note.remove_item(0);
        assert_eq!(note.subtotal(), 0.0);
        assert_eq!(note.total(), 0.0);
    }

    #[test]
    fn field_names_parse_from_form_names() {
        assert_eq!(
            "unit_price".parse::<DeliveryNoteItemField>().unwrap(),
            DeliveryNoteItemField::UnitPrice
        );
        assert_eq!("tax_rate".parse::<DeliveryNoteField>().unwrap(), DeliveryNoteField::TaxRate);
        assert!("amount".parse::<DeliveryNoteItemField>().is_err());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add,
        Remove(usize),
        Update(usize, DeliveryNoteItemField, String),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        let field = prop::sample::select(vec![
            DeliveryNoteItemField::Quantity,
            DeliveryNoteItemField::UnitPrice,
            DeliveryNoteItemField::Discount,
        ]);
        let raw = prop_oneof![
            (-50i64..500).prop_map(|v| v.to_string()),
            (-100.0f64..10_000.0).prop_map(|v| format!("{v:.2}")),
            Just(String::new()),
            Just("abc".to_string()),
        ];
        prop_oneof![
            Just(Op::Add),
            (0usize..8).prop_map(Op::Remove),
            (0usize..8, field, raw).prop_map(|(i, f, r)| Op::Update(i, f, r)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: after any interleaving of add/remove/update, every line
        /// amount matches its formula and the subtotal is the exact sum.
        #[test]
        fn derived_values_track_any_mutation_sequence(
            ops in prop::collection::vec(op_strategy(), 0..40)
        ) {
            let mut note = empty_note();
            for op in ops {
                match op {
                    Op::Add => note.add_item(),
                    Op::Remove(i) => note.remove_item(i),
                    Op::Update(i, f, raw) => note.update_item(i, f, &raw),
                }

                let mut expected = 0.0;
                for item in note.items() {
                    prop_assert!(item.quantity >= 0);
                    prop_assert_eq!(
                        item.amount(),
                        item.quantity as f64 * (item.unit_price - item.discount)
                    );
                    expected += item.amount();
                }
                prop_assert_eq!(note.subtotal(), expected);
            }
        }
    }
}
