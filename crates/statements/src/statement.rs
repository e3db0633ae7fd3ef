use core::convert::Infallible;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use docforge_core::{
    Aggregate, AggregateRoot, DocumentCommand, DocumentEvent, DocumentId, Entity, IssuerProfile,
    ItemId, ItemList, calendar, coerce, document_fields, money,
};

use crate::aging::{AgingBuckets, age_in_days};

pub const DOCUMENT: &str = "statement";

document_fields! {
    /// Header fields of an account statement.
    pub enum StatementField for "statement" {
        ProviderName => "provider_name",
        ProviderAddress => "provider_address",
        ProviderCityStateZip => "provider_city_state_zip",
        ProviderPhone => "provider_phone",
        ClientName => "client_name",
        ClientAddress => "client_address",
        ClientCity => "client_city",
        ClientState => "client_state",
        ClientCountry => "client_country",
        AccountNumber => "account_number",
        Terms => "terms",
        StatementDate => "statement_date",
    }
}

document_fields! {
    /// Editable fields of a statement transaction.
    pub enum TransactionField for "statement" {
        Date => "date",
        InvoiceNo => "invoice_no",
        Reference => "reference",
        Description => "description",
        Amount => "amount",
        Paid => "paid",
    }
}

/// One billed delivery note on the statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: ItemId,
    /// Issue date as typed, `YYYY-MM-DD`.
    pub date: String,
    pub invoice_no: String,
    /// Account the charge was posted to.
    pub reference: String,
    pub description: String,
    pub amount: f64,
    pub paid: f64,
}

impl Transaction {
    pub fn new(id: ItemId, date: NaiveDate) -> Self {
        Self {
            id,
            date: calendar::format_iso(date),
            invoice_no: String::new(),
            reference: String::new(),
            description: String::new(),
            amount: 0.0,
            paid: 0.0,
        }
    }

    /// Amount still owed.
    pub fn balance(&self) -> f64 {
        money::finite_or_zero(self.amount - self.paid)
    }

    fn apply_change(&mut self, change: &TransactionChange) {
        match change {
            TransactionChange::Date(v) => self.date = v.clone(),
            TransactionChange::InvoiceNo(v) => self.invoice_no = v.clone(),
            TransactionChange::Reference(v) => self.reference = v.clone(),
            TransactionChange::Description(v) => self.description = v.clone(),
            TransactionChange::Amount(v) => self.amount = *v,
            TransactionChange::Paid(v) => self.paid = *v,
        }
    }
}

impl Entity for Transaction {
    type Id = ItemId;

    fn id(&self) -> &ItemId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransactionChange {
    Date(String),
    InvoiceNo(String),
    Reference(String),
    Description(String),
    Amount(f64),
    Paid(f64),
}

impl TransactionField {
    pub fn coerce(self, raw: &str) -> TransactionChange {
        match self {
            Self::Date => TransactionChange::Date(raw.to_string()),
            Self::InvoiceNo => TransactionChange::InvoiceNo(raw.to_string()),
            Self::Reference => TransactionChange::Reference(raw.to_string()),
            Self::Description => TransactionChange::Description(raw.to_string()),
            Self::Amount => TransactionChange::Amount(coerce::decimal(self.name(), raw, 0.0)),
            Self::Paid => TransactionChange::Paid(coerce::decimal(self.name(), raw, 0.0)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementHeader {
    pub provider_name: String,
    pub provider_address: String,
    pub provider_city_state_zip: String,
    pub provider_phone: String,
    pub client_name: String,
    pub client_address: String,
    pub client_city: String,
    pub client_state: String,
    pub client_country: String,
    pub account_number: String,
    pub terms: String,
    pub statement_date: String,
}

impl StatementHeader {
    fn seeded(issuer: &IssuerProfile, today: NaiveDate) -> Self {
        Self {
            provider_name: issuer.name.clone(),
            provider_address: issuer.address.clone(),
            provider_city_state_zip: issuer.details.clone(),
            provider_phone: issuer.phone.clone(),
            client_name: String::new(),
            client_address: String::new(),
            client_city: String::new(),
            client_state: String::new(),
            client_country: String::new(),
            account_number: String::new(),
            terms: String::new(),
            statement_date: calendar::format_iso(today),
        }
    }

    fn field_mut(&mut self, field: StatementField) -> &mut String {
        use StatementField as F;
        match field {
            F::ProviderName => &mut self.provider_name,
            F::ProviderAddress => &mut self.provider_address,
            F::ProviderCityStateZip => &mut self.provider_city_state_zip,
            F::ProviderPhone => &mut self.provider_phone,
            F::ClientName => &mut self.client_name,
            F::ClientAddress => &mut self.client_address,
            F::ClientCity => &mut self.client_city,
            F::ClientState => &mut self.client_state,
            F::ClientCountry => &mut self.client_country,
            F::AccountNumber => &mut self.account_number,
            F::Terms => &mut self.terms,
            F::StatementDate => &mut self.statement_date,
        }
    }
}

/// Statement headers are all text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementHeaderChange {
    pub field: StatementField,
    pub value: String,
}

pub type StatementCommand = DocumentCommand<StatementField, TransactionField>;
pub type StatementEvent = DocumentEvent<Transaction, StatementHeaderChange, TransactionChange>;

/// Aggregate root: Statement.
///
/// `opened_on` is the session's "today": new transactions are dated with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    id: DocumentId,
    opened_on: NaiveDate,
    header: StatementHeader,
    transactions: ItemList<Transaction>,
    version: u64,
}

impl Statement {
    pub fn new(issuer: &IssuerProfile, today: NaiveDate) -> Self {
        Self {
            id: DocumentId::new(),
            opened_on: today,
            header: StatementHeader::seeded(issuer, today),
            transactions: ItemList::new(),
            version: 0,
        }
    }

    pub fn header(&self) -> &StatementHeader {
        &self.header
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    /// Sum of open balances, as the total of [`Self::aging_buckets`] so the
    /// two always agree to the last bit.
    pub fn total_due(&self, today: NaiveDate) -> f64 {
        self.aging_buckets(today).total()
    }

    /// Statement date, or `today` when the header date cannot be read.
    pub fn effective_date(&self, today: NaiveDate) -> NaiveDate {
        calendar::parse_iso(&self.header.statement_date).unwrap_or(today)
    }

    /// Split the open balance by age relative to the statement date.
    ///
    /// Unreadable transaction dates are treated as issued `today`.
    pub fn aging_buckets(&self, today: NaiveDate) -> AgingBuckets {
        let statement_date = self.effective_date(today);
        let mut buckets = AgingBuckets::default();
        for transaction in &self.transactions {
            let issued = calendar::parse_iso(&transaction.date).unwrap_or(today);
            buckets.add(age_in_days(statement_date, issued), transaction.balance());
        }
        buckets
    }

    pub fn add_item(&mut self) {
        let Ok(_) = self.execute(&DocumentCommand::AddItem);
    }

    pub fn remove_item(&mut self, index: usize) {
        let Ok(_) = self.execute(&DocumentCommand::RemoveItem { index });
    }

    pub fn update_item(&mut self, index: usize, field: TransactionField, value: &str) {
        let Ok(_) = self.execute(&DocumentCommand::UpdateItem {
            index,
            field,
            value: value.to_string(),
        });
    }

    pub fn set_header_field(&mut self, field: StatementField, value: &str) {
        let Ok(_) = self.execute(&DocumentCommand::SetHeaderField {
            field,
            value: value.to_string(),
        });
    }
}

impl AggregateRoot for Statement {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for Statement {
    type Command = StatementCommand;
    type Event = StatementEvent;
    type Error = Infallible;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            DocumentEvent::ItemAdded(transaction) => self.transactions.push(transaction.clone()),
            DocumentEvent::ItemRemoved { item_id } => {
                self.transactions.remove(item_id);
            }
            DocumentEvent::ItemChanged { item_id, change } => {
                if let Some(transaction) = self.transactions.get_mut(item_id) {
                    transaction.apply_change(change);
                }
            }
            DocumentEvent::HeaderChanged(change) => {
                *self.header.field_mut(change.field) = change.value.clone();
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        let events = match command {
            DocumentCommand::AddItem => vec![DocumentEvent::ItemAdded(Transaction::new(
                ItemId::new(),
                self.opened_on,
            ))],
            DocumentCommand::RemoveItem { index } => match self.transactions.id_at(*index) {
                Some(item_id) => vec![DocumentEvent::ItemRemoved { item_id }],
                None => {
                    debug!(
                        document = DOCUMENT,
                        index,
                        len = self.transactions.len(),
                        "remove ignored: index out of range"
                    );
                    Vec::new()
                }
            },
            DocumentCommand::UpdateItem {
                index,
                field,
                value,
            } => match self.transactions.id_at(*index) {
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
                vec![DocumentEvent::HeaderChanged(StatementHeaderChange {
                    field: *field,
                    value: value.clone(),
                })]
            }
        };
        Ok(events)
    }
}
