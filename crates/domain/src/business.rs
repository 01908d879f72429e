use std::fmt::{Display, Formatter};

use beauty_control_core::BusinessId;
use serde::{Deserialize, Serialize};

use crate::{Permission, Role};

/// Resolved access decision for one (business, user) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessAccessGrant {
    /// Business the grant applies to.
    pub business_id: BusinessId,
    /// Display name of the business, when the backend returned one.
    pub business_name: Option<String>,
    /// Whether the user may act within the business.
    pub has_access: bool,
    /// Role the user holds inside this business.
    pub role: Role,
    /// Business-scoped permissions, which may differ from the platform role's.
    pub permissions: Vec<Permission>,
    /// Whether the user owns the business.
    pub is_owner: bool,
}

impl BusinessAccessGrant {
    /// Returns whether the grant lists a business-scoped permission.
    #[must_use]
    pub fn allows(&self, permission: Permission) -> bool {
        self.has_access && self.permissions.contains(&permission)
    }
}

/// The business the session is currently acting within.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveBusiness {
    /// Business identifier.
    pub business_id: BusinessId,
    /// Display name kept for the business selector.
    pub business_name: Option<String>,
    /// Whether access was confirmed by the last validation.
    pub has_access: bool,
    /// Role inside the business.
    pub role: Role,
    /// Business-scoped permissions.
    pub permissions: Vec<Permission>,
    /// Whether the user owns the business.
    pub is_owner: bool,
}

impl ActiveBusiness {
    /// Marks access as revoked while keeping identity fields for display.
    pub fn revoke_access(&mut self) {
        self.has_access = false;
        self.permissions.clear();
    }
}

impl From<BusinessAccessGrant> for ActiveBusiness {
    fn from(value: BusinessAccessGrant) -> Self {
        Self {
            business_id: value.business_id,
            business_name: value.business_name,
            has_access: value.has_access,
            role: value.role,
            permissions: value.permissions,
            is_owner: value.is_owner,
        }
    }
}

/// Cache key for a business access grant, rendered as `"{business}-{user}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BusinessAccessKey {
    business_id: BusinessId,
    user_id: String,
}

impl BusinessAccessKey {
    /// Creates a key for one business and user.
    #[must_use]
    pub fn new(business_id: BusinessId, user_id: impl Into<String>) -> Self {
        Self {
            business_id,
            user_id: user_id.into(),
        }
    }

    /// Returns the business half of the key.
    #[must_use]
    pub fn business_id(&self) -> &BusinessId {
        &self.business_id
    }

    /// Returns the user half of the key.
    #[must_use]
    pub fn user_id(&self) -> &str {
        self.user_id.as_str()
    }

    /// Returns the prefix shared by every key of a business.
    #[must_use]
    pub fn business_prefix(business_id: &BusinessId) -> String {
        format!("{business_id}-")
    }

    /// Returns whether this key belongs to the business.
    ///
    /// Matches on the rendered prefix, so business `b1` also matches keys of
    /// a business whose id starts with `b1-`.
    #[must_use]
    pub fn starts_with_business(&self, business_id: &BusinessId) -> bool {
        self.to_string()
            .starts_with(Self::business_prefix(business_id).as_str())
    }
}

impl Display for BusinessAccessKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}-{}", self.business_id, self.user_id)
    }
}
