//! One row of the package table: piece count, measurements in inches and
//! weights in pounds.

use serde::{Deserialize, Serialize};

use docforge_core::{Entity, ItemId, coerce, document_fields, money};

pub const CUBIC_INCHES_PER_FOOT: f64 = 1728.0;

document_fields! {
    /// Editable fields of a package row.
    pub enum PackageDimensionField for "warehouse_receipt" {
        Bultos => "bultos",
        Largo => "largo",
        Ancho => "ancho",
        Alto => "alto",
        Pounds => "pounds",
        Pt => "pt",
        Referencia => "referencia",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDimension {
    pub id: ItemId,
    /// Pieces in this row.
    pub bultos: i64,
    pub largo: f64,
    pub ancho: f64,
    pub alto: f64,
    pub pounds: f64,
    /// Chargeable weight for the row ("peso tasable").
    pub pt: f64,
    pub referencia: String,
}

impl PackageDimension {
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            bultos: 1,
            largo: 0.0,
            ancho: 0.0,
            alto: 0.0,
            pounds: 0.0,
            pt: 0.0,
            referencia: String::new(),
        }
    }

    /// Volume in cubic feet; 0 unless every side is positive.
    pub fn cubic_feet(&self) -> f64 {
        if self.largo > 0.0 && self.ancho > 0.0 && self.alto > 0.0 {
            money::finite_or_zero((self.largo * self.ancho * self.alto) / CUBIC_INCHES_PER_FOOT)
        } else {
            0.0
        }
    }

    pub(crate) fn apply_change(&mut self, change: &PackageDimensionChange) {
        match change {
            PackageDimensionChange::Bultos(v) => self.bultos = *v,
            PackageDimensionChange::Largo(v) => self.largo = *v,
            PackageDimensionChange::Ancho(v) => self.ancho = *v,
            PackageDimensionChange::Alto(v) => self.alto = *v,
            PackageDimensionChange::Pounds(v) => self.pounds = *v,
            PackageDimensionChange::Pt(v) => self.pt = *v,
            PackageDimensionChange::Referencia(v) => self.referencia = v.clone(),
        }
    }
}

impl Entity for PackageDimension {
    type Id = ItemId;

    fn id(&self) -> &ItemId {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PackageDimensionChange {
    Bultos(i64),
    Largo(f64),
    Ancho(f64),
    Alto(f64),
    Pounds(f64),
    Pt(f64),
    Referencia(String),
}

impl PackageDimensionField {
    pub fn coerce(self, raw: &str) -> PackageDimensionChange {
        let name = self.name();
        match self {
            Self::Bultos => PackageDimensionChange::Bultos(coerce::count(name, raw, 0)),
            Self::Largo => PackageDimensionChange::Largo(coerce::decimal(name, raw, 0.0)),
            Self::Ancho => PackageDimensionChange::Ancho(coerce::decimal(name, raw, 0.0)),
            Self::Alto => PackageDimensionChange::Alto(coerce::decimal(name, raw, 0.0)),
            Self::Pounds => PackageDimensionChange::Pounds(coerce::decimal(name, raw, 0.0)),
            Self::Pt => PackageDimensionChange::Pt(coerce::decimal(name, raw, 0.0)),
            Self::Referencia => PackageDimensionChange::Referencia(raw.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sized(largo: f64, ancho: f64, alto: f64) -> PackageDimension {
        PackageDimension {
            largo,
            ancho,
            alto,
            ..PackageDimension::new(ItemId::new())
        }
    }

    #[test]
    fn one_cubic_foot() {
        assert_eq!(sized(12.0, 12.0, 12.0).cubic_feet(), 1.0);
    }

    #[test]
    fn any_non_positive_side_yields_zero_volume() {
        assert_eq!(sized(0.0, 10.0, 10.0).cubic_feet(), 0.0);
        assert_eq!(sized(10.0, 0.0, 10.0).cubic_feet(), 0.0);
        assert_eq!(sized(10.0, 10.0, -4.0).cubic_feet(), 0.0);
        assert_eq!(sized(0.0, 0.0, 0.0).cubic_feet(), 0.0);
    }

    #[test]
    fn overflowing_volume_is_zero() {
        assert_eq!(sized(1e300, 1e300, 1e300).cubic_feet(), 0.0);
    }

    #[test]
    fn smallest_positive_sides_still_count() {
        let eps = f64::EPSILON;
        let expected = (eps * 10.0 * 10.0) / CUBIC_INCHES_PER_FOOT;
        assert_eq!(sized(eps, 10.0, 10.0).cubic_feet(), expected);
        assert!(expected > 0.0);
    }

    #[test]
    fn bultos_truncates_and_clamps() {
        assert_eq!(
            PackageDimensionField::Bultos.coerce("2.7"),
            PackageDimensionChange::Bultos(2)
        );
        assert_eq!(
            PackageDimensionField::Bultos.coerce("-3"),
            PackageDimensionChange::Bultos(0)
        );
        assert_eq!(
            PackageDimensionField::Bultos.coerce("many"),
            PackageDimensionChange::Bultos(0)
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 256, ..ProptestConfig::default() })]

        /// Property: volume is the cubic-inch product over 1728 iff all sides are positive.
        #[test]
        fn cubic_feet_formula(l in -50.0f64..200.0, a in -50.0f64..200.0, h in -50.0f64..200.0) {
            let expected = if l > 0.0 && a > 0.0 && h > 0.0 { (l * a * h) / 1728.0 } else { 0.0 };
            prop_assert_eq!(sized(l, a, h).cubic_feet(), expected);
        }
    }
}
