//! Session configuration from the environment.

use std::path::PathBuf;

use docforge_core::IssuerProfile;

pub const COMPANY_NAME_ENV: &str = "DOCFORGE_COMPANY_NAME";
pub const COMPANY_ADDRESS_ENV: &str = "DOCFORGE_COMPANY_ADDRESS";
pub const COMPANY_DETAILS_ENV: &str = "DOCFORGE_COMPANY_DETAILS";
pub const COMPANY_EMAIL_ENV: &str = "DOCFORGE_COMPANY_EMAIL";
pub const COMPANY_PHONE_ENV: &str = "DOCFORGE_COMPANY_PHONE";
pub const COMPANY_TAX_ID_ENV: &str = "DOCFORGE_COMPANY_TAX_ID";
pub const STAGING_DIR_ENV: &str = "DOCFORGE_STAGING_DIR";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Seeds the issuer fields of every new document.
    pub issuer: IssuerProfile,
    /// When set, artifacts are written here, read back and removed before
    /// being handed out. `None` keeps exports in memory.
    pub staging_dir: Option<PathBuf>,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = IssuerProfile::default();

        let name = get(COMPANY_NAME_ENV).unwrap_or_else(|| {
            tracing::warn!("{COMPANY_NAME_ENV} not set; using placeholder issuer name");
            defaults.name.clone()
        });
        let tax_id = get(COMPANY_TAX_ID_ENV).unwrap_or_else(|| {
            tracing::warn!("{COMPANY_TAX_ID_ENV} not set; using placeholder tax id");
            defaults.tax_id.clone()
        });

        let issuer = IssuerProfile {
            name,
            tax_id,
            address: get(COMPANY_ADDRESS_ENV).unwrap_or(defaults.address),
            details: get(COMPANY_DETAILS_ENV).unwrap_or(defaults.details),
            email: get(COMPANY_EMAIL_ENV).unwrap_or(defaults.email),
            phone: get(COMPANY_PHONE_ENV).unwrap_or(defaults.phone),
            logo_url: defaults.logo_url,
        };

        Self {
            issuer,
            staging_dir: get(STAGING_DIR_ENV).map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_values_fall_back_to_defaults() {
        let config = SessionConfig::from_lookup(|_| None);
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn values_override_issuer_fields() {
        let vars = HashMap::from([
            (COMPANY_NAME_ENV, "Carga Rápida C.A."),
            (COMPANY_PHONE_ENV, "+58 212 555 0000"),
            (COMPANY_EMAIL_ENV, "   "),
            (STAGING_DIR_ENV, "/tmp/docforge"),
        ]);
        let config = SessionConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.issuer.name, "Carga Rápida C.A.");
        assert_eq!(config.issuer.phone, "+58 212 555 0000");
        assert_eq!(config.issuer.email, IssuerProfile::default().email);
        assert_eq!(config.staging_dir, Some(PathBuf::from("/tmp/docforge")));
    }
}
