use std::fmt::{Display, Formatter};
use std::str::FromStr;

use beauty_control_core::AppError;
use serde::{Deserialize, Serialize};

/// Coarse-grained identity classification assigned to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Platform owner operating the SaaS itself.
    Owner,
    /// Salon administrator.
    Business,
    /// Professional delivering services.
    Specialist,
    /// Front-desk staff managing the agenda.
    Receptionist,
    /// Front-desk staff who also delivers services.
    ReceptionistSpecialist,
    /// Salon administrator who also delivers services.
    BusinessSpecialist,
    /// End customer booking appointments.
    Client,
}

impl Role {
    /// Returns the stable transport value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Business => "BUSINESS",
            Self::Specialist => "SPECIALIST",
            Self::Receptionist => "RECEPTIONIST",
            Self::ReceptionistSpecialist => "RECEPTIONIST_SPECIALIST",
            Self::BusinessSpecialist => "BUSINESS_SPECIALIST",
            Self::Client => "CLIENT",
        }
    }

    /// Returns all known roles, most senior first.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[
            Role::Owner,
            Role::Business,
            Role::BusinessSpecialist,
            Role::ReceptionistSpecialist,
            Role::Receptionist,
            Role::Specialist,
            Role::Client,
        ];

        ALL
    }

    /// Returns this role's position in the authority hierarchy.
    #[must_use]
    pub fn level(&self) -> RoleLevel {
        match self {
            Self::Owner => RoleLevel::from_half_steps(10),
            Self::Business | Self::BusinessSpecialist => RoleLevel::from_half_steps(8),
            Self::ReceptionistSpecialist => RoleLevel::from_half_steps(7),
            Self::Receptionist => RoleLevel::from_half_steps(6),
            Self::Specialist => RoleLevel::from_half_steps(4),
            Self::Client => RoleLevel::from_half_steps(2),
        }
    }

    /// Parses a transport value into a role.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown role value '{value}'")))
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Numeric hierarchy level of a role.
///
/// Levels run from 1 to 5 with one hybrid role sitting at 3.5, so the value
/// is stored in half-steps to keep ordering total and equality exact.
/// [`RoleLevel::UNRANKED`] (level 0) is used for roles that cannot be
/// resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoleLevel(u8);

impl RoleLevel {
    /// Level assigned to unknown roles.
    pub const UNRANKED: Self = Self(0);

    const fn from_half_steps(value: u8) -> Self {
        Self(value)
    }

    /// Returns the level as displayed in the hierarchy table (e.g. `3.5`).
    #[must_use]
    pub fn as_f32(&self) -> f32 {
        f32::from(self.0) / 2.0
    }
}

/// Resolves a transport role name to its level, defaulting to
/// [`RoleLevel::UNRANKED`] when the name is unknown.
#[must_use]
pub fn role_level_of(value: &str) -> RoleLevel {
    Role::from_str(value)
        .map(|role| role.level())
        .unwrap_or(RoleLevel::UNRANKED)
}

/// Lifecycle status of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    /// Account may use its permissions.
    Active,
    /// Account was deactivated.
    Inactive,
    /// Account was suspended by an administrator.
    Suspended,
    /// Account has not completed onboarding.
    Pending,
}

impl UserStatus {
    /// Returns the stable transport value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Suspended => "SUSPENDED",
            Self::Pending => "PENDING",
        }
    }

    /// Returns all known statuses.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::Active, Self::Inactive, Self::Suspended, Self::Pending]
    }

    /// Returns whether permission checks may succeed for this status.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl FromStr for UserStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown user status value '{value}'")))
    }
}
