//! Warehouse receipts ("recibo de almacén") and package measurements.

pub mod dimension;
pub mod receipt;

pub use dimension::{
    CUBIC_INCHES_PER_FOOT, PackageDimension, PackageDimensionChange, PackageDimensionField,
};
pub use receipt::{
    LEGAL_DISCLAIMER, WarehouseReceipt, WarehouseReceiptCommand, WarehouseReceiptEvent,
    WarehouseReceiptField, WarehouseReceiptHeader, WarehouseReceiptHeaderChange,
};
