//! Sales documents: the quotation ("cotización").
//!
//! Pure domain logic only: no IO, no rendering.

pub mod quotation;

pub use quotation::{
    Quotation, QuotationCommand, QuotationEvent, QuotationField, QuotationHeader,
    QuotationHeaderChange, QuotationItem, QuotationItemChange, QuotationItemField,
};
