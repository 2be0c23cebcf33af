use std::fmt::{Display, Formatter};
use std::str::FromStr;

use procura_core::AppError;
use serde::{Deserialize, Serialize};

/// Fixed enum role carried by every portal user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Tenant administrator.
    Admin,
    /// Plain business user.
    User,
    /// Buyer running tenders and purchase orders.
    Buyer,
    /// Procurement manager supervising buyers.
    Manager,
    /// Finance officer handling invoices and payments.
    Finance,
    /// External vendor bidding on tenders.
    Vendor,
    /// Approver signing off requisitions.
    Approver,
}

impl Role {
    /// Returns the stable transport value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
            Self::Buyer => "BUYER",
            Self::Manager => "MANAGER",
            Self::Finance => "FINANCE",
            Self::Vendor => "VENDOR",
            Self::Approver => "APPROVER",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[
            Role::Admin,
            Role::User,
            Role::Buyer,
            Role::Manager,
            Role::Finance,
            Role::Vendor,
            Role::Approver,
        ];

        ALL
    }

    /// Returns the roles this role may stand in for, itself included.
    ///
    /// This is role inheritance only; it says nothing about what a role may do.
    #[must_use]
    pub fn inherited_roles(&self) -> &'static [Self] {
        match self {
            Self::Admin => Self::all(),
            Self::Manager => &[Role::Manager, Role::Buyer, Role::User],
            Self::Buyer => &[Role::Buyer, Role::User],
            Self::Approver => &[Role::Approver, Role::User],
            Self::User => &[Role::User],
            Self::Finance => &[Role::Finance],
            Self::Vendor => &[Role::Vendor],
        }
    }

    /// Returns whether this role satisfies `required` through the hierarchy.
    #[must_use]
    pub fn satisfies(&self, required: Self) -> bool {
        self.inherited_roles().contains(&required)
    }

    /// Parses a transport value into a role.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            "BUYER" => Ok(Self::Buyer),
            "MANAGER" => Ok(Self::Manager),
            "FINANCE" => Ok(Self::Finance),
            "VENDOR" => Ok(Self::Vendor),
            "APPROVER" => Ok(Self::Approver),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}
