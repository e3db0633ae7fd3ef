//! Issuing company details used to seed document headers.

use serde::{Deserialize, Serialize};

/// Company that issues every document in a session.
///
/// Each document copies these values into its own header fields at creation;
/// after that the header is edited independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerProfile {
    pub name: String,
    pub address: String,
    /// City, state and postal code line.
    pub details: String,
    pub email: String,
    pub phone: String,
    /// RIF/Cédula.
    pub tax_id: String,
    pub logo_url: String,
}

impl Default for IssuerProfile {
    fn default() -> Self {
        Self {
            name: "Nosglobal Logistic".to_string(),
            address: "Av. Principal 1000, Torre A, Piso 5".to_string(),
            details: "Caracas, Distrito Capital, 1010".to_string(),
            email: "info@nosglobal.com".to_string(),
            phone: "+58 424-4966616".to_string(),
            tax_id: "J-123456789".to_string(),
            logo_url: "/nosglobal-logo.png".to_string(),
        }
    }
}
