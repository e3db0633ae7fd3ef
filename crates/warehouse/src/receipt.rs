use core::convert::Infallible;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use docforge_core::{
    Aggregate, AggregateRoot, DocumentCommand, DocumentEvent, DocumentId, IssuerProfile, ItemId,
    ItemList, calendar, coerce, document_fields, money,
};

use crate::dimension::{PackageDimension, PackageDimensionChange, PackageDimensionField};

pub const DOCUMENT: &str = "warehouse_receipt";

/// Liability notice printed at the foot of every receipt.
pub const LEGAL_DISCLAIMER: &str = "Nuestra empresa no se hace responsable por pérdida o daños totales y/o parciales de mercancía \
que NO SE ENCUENTRE ASEGURADA. El seguro únicamente aplicará bajo previa inspección de \
los artículos y aprobación de los mismos. Igualmente, Nosglobal Logistic no se hace responsable de \
paquetes perdidos en tránsito desde su proveedor hasta nuestros almacenes, ni de paquetes que \
no contengan el servicio de firma requerida. Por tal razón, recomendamos que sus envíos sean \
manejados por empresas que puedan proveerle un número de rastreo (tracking) para de este \
modo tener un mayor control de su mercancía. Les recomendamos los pesos promedio por caja \
es de un máximo de 90 Lbs. Cajas que sobrepase los pesos permitidos, La Compañía no se hace \
responsable por daños en el manejo de su carga. Los equipos electrónicos como Televisores se \
reciben solamente como mercancía general.";

document_fields! {
    /// Header fields of a warehouse receipt.
    pub enum WarehouseReceiptField for "warehouse_receipt" {
        CompanyName => "company_name",
        ReceiptNumber => "receipt_number",
        WarehouseLocation => "warehouse_location",
        ReceiptDate => "receipt_date",
        Oficina => "oficina",
        Remitente => "remitente",
        Referencia => "referencia",
        Destinatario => "destinatario",
        NoPedido => "no_pedido",
        EntregadoPor => "entregado_por",
        TrackingNumber => "tracking_number",
        Factura => "factura",
        Descripcion => "descripcion",
        LegalDisclaimer => "legal_disclaimer",
        /// Pounds, numeric. Entered by hand, not summed.
        PesoTasable => "peso_tasable",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseReceiptHeader {
    pub company_name: String,
    pub receipt_number: String,
    pub warehouse_location: String,
    pub receipt_date: String,
    pub oficina: String,
    pub remitente: String,
    pub referencia: String,
    pub destinatario: String,
    pub no_pedido: String,
    pub entregado_por: String,
    pub tracking_number: String,
    pub factura: String,
    pub descripcion: String,
    pub legal_disclaimer: String,
    pub peso_tasable: f64,
}

impl WarehouseReceiptHeader {
    fn seeded(issuer: &IssuerProfile, today: NaiveDate) -> Self {
        Self {
            company_name: issuer.name.clone(),
            receipt_number: String::new(),
            warehouse_location: String::new(),
            receipt_date: calendar::format_iso(today),
            oficina: String::new(),
            remitente: String::new(),
            referencia: String::new(),
            destinatario: String::new(),
            no_pedido: String::new(),
            entregado_por: String::new(),
            tracking_number: String::new(),
            factura: String::new(),
            descripcion: String::new(),
            legal_disclaimer: LEGAL_DISCLAIMER.to_string(),
            peso_tasable: 0.0,
        }
    }

    fn text_mut(&mut self, field: WarehouseReceiptField) -> Option<&mut String> {
        use WarehouseReceiptField as F;
        let slot = match field {
            F::CompanyName => &mut self.company_name,
            F::ReceiptNumber => &mut self.receipt_number,
            F::WarehouseLocation => &mut self.warehouse_location,
            F::ReceiptDate => &mut self.receipt_date,
            F::Oficina => &mut self.oficina,
            F::Remitente => &mut self.remitente,
            F::Referencia => &mut self.referencia,
            F::Destinatario => &mut self.destinatario,
            F::NoPedido => &mut self.no_pedido,
            F::EntregadoPor => &mut self.entregado_por,
            F::TrackingNumber => &mut self.tracking_number,
            F::Factura => &mut self.factura,
            F::Descripcion => &mut self.descripcion,
            F::LegalDisclaimer => &mut self.legal_disclaimer,
            F::PesoTasable => return None,
        };
        Some(slot)
    }

    fn apply_change(&mut self, change: &WarehouseReceiptHeaderChange) {
        match change {
            WarehouseReceiptHeaderChange::PesoTasable(v) => self.peso_tasable = *v,
            WarehouseReceiptHeaderChange::Text { field, value } => {
                if let Some(slot) = self.text_mut(*field) {
                    *slot = value.clone();
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WarehouseReceiptHeaderChange {
    Text {
        field: WarehouseReceiptField,
        value: String,
    },
    PesoTasable(f64),
}

impl WarehouseReceiptField {
    pub fn coerce(self, raw: &str) -> WarehouseReceiptHeaderChange {
        match self {
            Self::PesoTasable => {
                WarehouseReceiptHeaderChange::PesoTasable(coerce::decimal(self.name(), raw, 0.0))
            }
            field => WarehouseReceiptHeaderChange::Text {
                field,
                value: raw.to_string(),
            },
        }
    }
}

pub type WarehouseReceiptCommand = DocumentCommand<WarehouseReceiptField, PackageDimensionField>;
pub type WarehouseReceiptEvent =
    DocumentEvent<PackageDimension, WarehouseReceiptHeaderChange, PackageDimensionChange>;

/// Aggregate root: WarehouseReceipt.
#[derive(Debug, Clone, PartialEq)]
pub struct WarehouseReceipt {
    id: DocumentId,
    header: WarehouseReceiptHeader,
    dimensions: ItemList<PackageDimension>,
    version: u64,
}

impl WarehouseReceipt {
    pub fn new(issuer: &IssuerProfile, today: NaiveDate) -> Self {
        Self {
            id: DocumentId::new(),
            header: WarehouseReceiptHeader::seeded(issuer, today),
            dimensions: ItemList::new(),
            version: 0,
        }
    }

    pub fn header(&self) -> &WarehouseReceiptHeader {
        &self.header
    }

    pub fn dimensions(&self) -> &[PackageDimension] {
        self.dimensions.as_slice()
    }

    pub fn total_bultos(&self) -> i64 {
        self.dimensions.iter().map(|d| d.bultos).fold(0, i64::saturating_add)
    }

    /// Gross weight: sum of row weights, pounds.
    pub fn calculated_peso_bruto(&self) -> f64 {
        money::finite_or_zero(self.dimensions.iter().map(|d| d.pounds).sum())
    }

    /// Total volume, cubic feet.
    pub fn calculated_volumen(&self) -> f64 {
        money::finite_or_zero(self.dimensions.iter().map(PackageDimension::cubic_feet).sum())
    }

    pub fn add_item(&mut self) {
        let Ok(_) = self.execute(&DocumentCommand::AddItem);
    }

    pub fn remove_item(&mut self, index: usize) {
        let Ok(_) = self.execute(&DocumentCommand::RemoveItem { index });
    }

    pub fn update_item(&mut self, index: usize, field: PackageDimensionField, value: &str) {
        let Ok(_) = self.execute(&DocumentCommand::UpdateItem {
            index,
            field,
            value: value.to_string(),
        });
    }

    pub fn set_header_field(&mut self, field: WarehouseReceiptField, value: &str) {
        let Ok(_) = self.execute(&DocumentCommand::SetHeaderField {
            field,
            value: value.to_string(),
        });
    }
}

impl AggregateRoot for WarehouseReceipt {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for WarehouseReceipt {
    type Command = WarehouseReceiptCommand;
    type Event = WarehouseReceiptEvent;
    type Error = Infallible;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            DocumentEvent::ItemAdded(dimension) => self.dimensions.push(dimension.clone()),
            DocumentEvent::ItemRemoved { item_id } => {
                self.dimensions.remove(item_id);
            }
            DocumentEvent::ItemChanged { item_id, change } => {
                if let Some(dimension) = self.dimensions.get_mut(item_id) {
                    dimension.apply_change(change);
                }
            }
            DocumentEvent::HeaderChanged(change) => self.header.apply_change(change),
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        let events = match command {
            DocumentCommand::AddItem => {
                vec![DocumentEvent::ItemAdded(PackageDimension::new(ItemId::new()))]
            }
            DocumentCommand::RemoveItem { index } => match self.dimensions.id_at(*index) {
                Some(item_id) => vec![DocumentEvent::ItemRemoved { item_id }],
                None => {
                    debug!(
                        document = DOCUMENT,
                        index,
                        len = self.dimensions.len(),
                        "remove ignored: index out of range"
                    );
                    Vec::new()
                }
            },
            DocumentCommand::UpdateItem {
                index,
                field,
                value,
            } => match self.dimensions.id_at(*index) {
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

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 23).unwrap()
    }

    fn receipt() -> WarehouseReceipt {
        WarehouseReceipt::new(&IssuerProfile::default(), today())
    }

    fn with_rows(rows: &[(&str, &str, &str, &str, &str)]) -> WarehouseReceipt {
        let mut receipt = receipt();
        for (i, (bultos, l, a, h, lbs)) in rows.iter().enumerate() {
            receipt.add_item();
            receipt.update_item(i, PackageDimensionField::Bultos, bultos);
            receipt.update_item(i, PackageDimensionField::Largo, l);
            receipt.update_item(i, PackageDimensionField::Ancho, a);
            receipt.update_item(i, PackageDimensionField::Alto, h);
            receipt.update_item(i, PackageDimensionField::Pounds, lbs);
        }
        receipt
    }

    #[test]
    fn new_receipt_carries_date_and_disclaimer() {
        let receipt = receipt();
        assert_eq!(receipt.header().receipt_date, "2025-11-23");
        assert_eq!(receipt.header().legal_disclaimer, LEGAL_DISCLAIMER);
        assert!(receipt.dimensions().is_empty());
        assert_eq!(receipt.total_bultos(), 0);
    }

    #[test]
    fn huge_piece_counts_saturate_instead_of_overflowing() {
        let receipt = with_rows(&[("9e18", "", "", "", ""), ("9e18", "", "", "", "")]);
        assert_eq!(receipt.dimensions()[0].bultos, 9_000_000_000_000_000_000);
        assert_eq!(receipt.total_bultos(), i64::MAX);
    }

    #[test]
    fn new_rows_default_to_one_piece() {
        let mut receipt = receipt();
        receipt.add_item();
        assert_eq!(receipt.dimensions()[0].bultos, 1);
        assert_eq!(receipt.total_bultos(), 1);
    }

    #[test]
    fn summary_sums_rows() {
        let receipt = with_rows(&[("2", "12", "12", "12", "10.5"), ("3", "24", "12", "6", "4.5")]);
        assert_eq!(receipt.total_bultos(), 5);
        assert_eq!(receipt.calculated_peso_bruto(), 15.0);
        assert_eq!(receipt.calculated_volumen(), 2.0);
    }

    #[test]
    fn row_with_missing_side_adds_no_volume() {
        let receipt = with_rows(&[("1", "12", "12", "12", "1"), ("1", "12", "", "12", "1")]);
        assert_eq!(receipt.calculated_volumen(), 1.0);
    }

    #[test]
    fn chargeable_weight_is_manual() {
        let mut receipt = with_rows(&[("1", "10", "10", "10", "40")]);
        assert_eq!(receipt.header().peso_tasable, 0.0);
        receipt.set_header_field(WarehouseReceiptField::PesoTasable, "55.5");
        assert_eq!(receipt.header().peso_tasable, 55.5);
        receipt.set_header_field(WarehouseReceiptField::PesoTasable, "n/a");
        assert_eq!(receipt.header().peso_tasable, 0.0);
    }

    #[test]
    fn clearing_the_disclaimer_is_allowed() {
        let mut receipt = receipt();
        receipt.set_header_field(WarehouseReceiptField::LegalDisclaimer, "");
        assert_eq!(receipt.header().legal_disclaimer, "");
    }

    #[test]
    fn removing_middle_row_keeps_order() {
        let mut receipt = with_rows(&[
            ("1", "", "", "", ""),
            ("2", "", "", "", ""),
            ("3", "", "", "", ""),
        ]);
        receipt.remove_item(1);
        let counts: Vec<i64> = receipt.dimensions().iter().map(|d| d.bultos).collect();
        assert_eq!(counts, vec![1, 3]);
        receipt.remove_item(9);
        assert_eq!(receipt.dimensions().len(), 2);
    }
}
