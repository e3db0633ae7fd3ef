//! Input coming from the form.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use docforge_core::{DocumentCommand, DomainError};
use docforge_export::DocumentKind;

use crate::error::SessionError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    DeliveryNote,
    Quotation,
    Statement,
    WarehouseReceipt,
}

impl DocumentType {
    pub const ALL: [DocumentType; 4] = [
        DocumentType::DeliveryNote,
        DocumentType::Quotation,
        DocumentType::Statement,
        DocumentType::WarehouseReceipt,
    ];

    pub const fn kind(self) -> DocumentKind {
        match self {
            Self::DeliveryNote => DocumentKind::DeliveryNote,
            Self::Quotation => DocumentKind::Quotation,
            Self::Statement => DocumentKind::Statement,
            Self::WarehouseReceipt => DocumentKind::WarehouseReceipt,
        }
    }

    pub const fn name(self) -> &'static str {
        self.kind().name()
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DocumentType {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|document| document.name() == s)
            .ok_or_else(|| SessionError::UnknownDocument(s.to_string()))
    }
}

/// One field edit. `index` addresses an item; without it the field is a
/// header field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditEvent {
    pub document: DocumentType,
    #[serde(default)]
    pub index: Option<usize>,
    pub field: String,
    pub value: String,
}

impl EditEvent {
    pub fn header(document: DocumentType, field: &str, value: &str) -> Self {
        Self {
            document,
            index: None,
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn item(document: DocumentType, index: usize, field: &str, value: &str) -> Self {
        Self {
            index: Some(index),
            ..Self::header(document, field, value)
        }
    }

    /// Resolve the field name against the document's header (`H`) or item
    /// (`F`) fields.
    pub fn command<H, F>(&self) -> Result<DocumentCommand<H, F>, SessionError>
    where
        H: FromStr<Err = DomainError>,
        F: FromStr<Err = DomainError>,
    {
        let value = self.value.clone();
        match self.index {
            Some(index) => match self.field.parse::<F>() {
                Ok(field) => Ok(DocumentCommand::UpdateItem { index, field, value }),
                Err(_) => Err(self.unknown_field()),
            },
            None => match self.field.parse::<H>() {
                Ok(field) => Ok(DocumentCommand::SetHeaderField { field, value }),
                Err(_) if self.field.parse::<F>().is_ok() => Err(SessionError::MissingIndex {
                    document: self.document,
                    field: self.field.clone(),
                }),
                Err(_) => Err(self.unknown_field()),
            },
        }
    }

    fn unknown_field(&self) -> SessionError {
        SessionError::UnknownField {
            document: self.document,
            field: self.field.clone(),
        }
    }
}

/// Anything the form can ask of a session, besides exporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UiAction {
    Edit(EditEvent),
    AddItem { document: DocumentType },
    RemoveItem { document: DocumentType, index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use docforge_invoicing::{DeliveryNoteCommand, DeliveryNoteField, DeliveryNoteItemField};

    #[test]
    fn header_edit_resolves_header_field() {
        let event = EditEvent::header(DocumentType::DeliveryNote, "tax_rate", "16");
        let command: DeliveryNoteCommand = event.command().unwrap();
        assert_eq!(
            command,
            DocumentCommand::SetHeaderField {
                field: DeliveryNoteField::TaxRate,
                value: "16".to_string()
            }
        );
    }

    #[test]
    fn item_edit_resolves_item_field() {
        let event = EditEvent::item(DocumentType::DeliveryNote, 2, "unit_price", "85");
        let command: DeliveryNoteCommand = event.command().unwrap();
        assert_eq!(
            command,
            DocumentCommand::UpdateItem {
                index: 2,
                field: DeliveryNoteItemField::UnitPrice,
                value: "85".to_string()
            }
        );
    }

    #[test]
    fn item_field_without_index_is_reported() {
        let event = EditEvent::header(DocumentType::DeliveryNote, "quantity", "3");
        let err = event.command::<DeliveryNoteField, DeliveryNoteItemField>().unwrap_err();
        assert!(matches!(err, SessionError::MissingIndex { .. }));
    }

    #[test]
    fn unknown_names_are_rejected() {
        let event = EditEvent::item(DocumentType::DeliveryNote, 0, "tax_rate", "3");
        let err = event.command::<DeliveryNoteField, DeliveryNoteItemField>().unwrap_err();
        assert_eq!(
            err,
            SessionError::UnknownField {
                document: DocumentType::DeliveryNote,
                field: "tax_rate".to_string()
            }
        );
    }

    #[test]
    fn ui_actions_read_from_json() {
        let actions: Vec<UiAction> = serde_json::from_str(
            r#"[
                {"action": "add_item", "document": "quotation"},
                {"action": "edit", "document": "quotation", "index": 0, "field": "quantity", "value": "4"},
                {"action": "edit", "document": "quotation", "field": "quote_number", "value": "Q-1"},
                {"action": "remove_item", "document": "statement", "index": 3}
            ]"#,
        )
        .unwrap();
        assert_eq!(actions.len(), 4);
        assert_eq!(
            actions[2],
            UiAction::Edit(EditEvent::header(DocumentType::Quotation, "quote_number", "Q-1"))
        );
    }

    #[test]
    fn document_names_round_trip_through_from_str() {
        for document in DocumentType::ALL {
            assert_eq!(document.name().parse::<DocumentType>(), Ok(document));
        }
        assert!("invoice".parse::<DocumentType>().is_err());
    }
}
