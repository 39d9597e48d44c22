//! Staff and customer accounts.

use serde::{Deserialize, Serialize};

use super::id::{AdminId, CustomerId};

/// Role of a staff account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access to the console.
    Admin,
    /// Any role the console does not know about; treated as non-admin.
    #[serde(untagged)]
    Other(String),
}

impl AdminRole {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Other(role) => role,
        }
    }
}

impl From<&str> for AdminRole {
    fn from(role: &str) -> Self {
        if role == "admin" {
            Self::Admin
        } else {
            Self::Other(role.to_owned())
        }
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signed-in staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    pub id: Option<AdminId>,
    pub name: String,
    pub email: String,
    pub role: Option<AdminRole>,
}

impl AdminProfile {
    /// Whether this account has the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Some(AdminRole::Admin))
    }
}

/// A storefront customer as listed in the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub order_count: u32,
}
