//! Field identifiers.
//!
//! The form addresses fields by name (`"unit_price"`, `"tax_rate"`). Each
//! document declares its fields once with [`document_fields!`], which yields a
//! closed enum, the wire name of every variant, and a `FromStr` that rejects
//! names the document does not define.

/// Declare a field-identifier enum for a document.
///
/// ```ignore
/// docforge_core::document_fields! {
///     /// Editable item fields.
///     pub enum ItemField for "quotation" {
///         Description => "description",
///         Quantity => "quantity",
///     }
/// }
/// ```
#[macro_export]
macro_rules! document_fields {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident for $document:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant ),+
        }

        impl $name {
            /// Every field, in form order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Name used by the form for this field.
            pub const fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $wire ),+
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl core::str::FromStr for $name {
            type Err = $crate::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|field| field.name() == s)
                    .ok_or_else(|| $crate::DomainError::unknown_field($document, s))
            }
        }
    };
}
