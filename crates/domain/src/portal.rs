use std::fmt::{Display, Formatter};
use std::str::FromStr;

use procura_core::AppError;
use serde::{Deserialize, Serialize};

use crate::NavSection;

mod menus;

/// Generic page every portal redirects to when the role check fails.
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Generic login page used when no portal can be derived.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Role-specific area of the procurement front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Portal {
    /// Tenant administration.
    Admin,
    /// External vendor self-service.
    Vendor,
    /// Buyer and procurement management.
    Buyer,
    /// Finance: invoices, payments and budgets.
    Finance,
    /// Internal business users raising requisitions.
    Business,
}

impl Portal {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Vendor => "vendor",
            Self::Buyer => "buyer",
            Self::Finance => "finance",
            Self::Business => "business",
        }
    }

    /// Returns all portals.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Portal] = &[
            Portal::Admin,
            Portal::Vendor,
            Portal::Buyer,
            Portal::Finance,
            Portal::Business,
        ];

        ALL
    }

    /// Returns the route prefix, e.g. `/admin`.
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Admin => "/admin",
            Self::Vendor => "/vendor",
            Self::Buyer => "/buyer",
            Self::Finance => "/finance",
            Self::Business => "/business",
        }
    }

    /// Returns the portal login route.
    #[must_use]
    pub fn login_path(&self) -> String {
        format!("{}/login", self.prefix())
    }

    /// Returns the portal landing route.
    #[must_use]
    pub fn home_path(&self) -> String {
        format!("{}/dashboard", self.prefix())
    }

    /// Returns whether `path` is a page reachable without a session.
    #[must_use]
    pub fn is_public_path(&self, path: &str) -> bool {
        const PUBLIC_PAGES: &[&str] = &["login", "register", "forgot-password"];

        path.strip_prefix(self.prefix())
            .and_then(|rest| rest.strip_prefix('/'))
            .map(|rest| rest.trim_end_matches('/'))
            .is_some_and(|page| PUBLIC_PAGES.contains(&page))
    }

    /// Finds the portal owning `path`, matching whole path segments only.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|portal| path_has_prefix(path, portal.prefix()))
    }

    /// Returns the static, unfiltered menu for this portal.
    #[must_use]
    pub fn menu(&self) -> Vec<NavSection> {
        match self {
            Self::Admin => menus::admin(),
            Self::Vendor => menus::vendor(),
            Self::Buyer => menus::buyer(),
            Self::Finance => menus::finance(),
            Self::Business => menus::business(),
        }
    }
}

impl Display for Portal {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Portal {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "vendor" => Ok(Self::Vendor),
            "buyer" => Ok(Self::Buyer),
            "finance" => Ok(Self::Finance),
            "business" => Ok(Self::Business),
            _ => Err(AppError::Validation(format!(
                "unknown portal value '{value}'"
            ))),
        }
    }
}

/// Returns whether `path` equals `prefix` or continues it with a new segment.
///
/// `/admin`, `/admin/` and `/admin/users` match `/admin`; `/administrator`
/// does not.
#[must_use]
pub fn path_has_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}
