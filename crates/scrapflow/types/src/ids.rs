//! Identifiers for transactions, configuration rows and tenancy scopes.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Unique identifier for a delivery transaction
    TransactionId
);

string_id!(
    /// Identity of a single configuration row (one version of a field)
    ConfigurationId
);

string_id!(
    /// Tenant owning transactions and configuration
    TenantId
);

string_id!(
    /// Factory within a tenant
    FactoryId
);

impl TransactionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl ConfigurationId {
    pub fn generate() -> Self {
        Self(format!("cfg-{}", uuid::Uuid::new_v4()))
    }
}
