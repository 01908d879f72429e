use std::fmt::{Display, Formatter};
use std::str::FromStr;

use beauty_control_core::AppError;
use serde::{Deserialize, Serialize};

/// Fine-grained capability token of the form `<resource>:<action>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Permission {
    /// View platform-wide metrics.
    PlatformViewMetrics,
    /// Manage every business on the platform.
    PlatformManageBusinesses,
    /// Manage subscription plans.
    PlatformManagePlans,
    /// Manage platform rule templates.
    PlatformManageRules,
    /// View business profile.
    BusinessView,
    /// Register a new business.
    BusinessCreate,
    /// Edit business profile.
    BusinessEdit,
    /// Delete a business.
    BusinessDelete,
    /// Change business settings and rules.
    BusinessSettings,
    /// View user accounts.
    UserView,
    /// Create user accounts.
    UserCreate,
    /// Edit user accounts.
    UserEdit,
    /// Delete user accounts.
    UserDelete,
    /// View every appointment of the business.
    AppointmentView,
    /// View only appointments assigned to or booked by the caller.
    AppointmentViewOwn,
    /// Book an appointment.
    AppointmentCreate,
    /// Reschedule or edit an appointment.
    AppointmentEdit,
    /// Cancel an appointment.
    AppointmentCancel,
    /// Mark an appointment as completed.
    AppointmentComplete,
    /// Delete an appointment.
    AppointmentDelete,
    /// View clients.
    ClientView,
    /// Register clients.
    ClientCreate,
    /// Edit clients.
    ClientEdit,
    /// Delete clients.
    ClientDelete,
    /// View a client's service history.
    ClientHistory,
    /// View the service catalog.
    ServiceView,
    /// Add services to the catalog.
    ServiceCreate,
    /// Edit catalog services.
    ServiceEdit,
    /// Remove catalog services.
    ServiceDelete,
    /// View staff members.
    StaffView,
    /// Add staff members.
    StaffCreate,
    /// Edit staff members.
    StaffEdit,
    /// Remove staff members.
    StaffDelete,
    /// Manage staff working hours.
    StaffSchedule,
    /// View schedules.
    ScheduleView,
    /// Edit schedules.
    ScheduleEdit,
    /// View invoices and billing data.
    BillingView,
    /// Manage billing data.
    BillingManage,
    /// View the business subscription.
    SubscriptionView,
    /// Change or cancel the business subscription.
    SubscriptionManage,
    /// View payments.
    PaymentView,
    /// Register payments.
    PaymentProcess,
    /// Refund payments.
    PaymentRefund,
    /// View reports.
    ReportView,
    /// Export reports.
    ReportExport,
    /// View commissions of every specialist.
    CommissionView,
    /// View the caller's own commissions.
    CommissionViewOwn,
    /// Configure and settle commissions.
    CommissionManage,
    /// View inventory.
    ProductView,
    /// Manage inventory.
    ProductManage,
    /// View own profile.
    ProfileView,
    /// Edit own profile.
    ProfileEdit,
}

impl Permission {
    /// Returns the stable `<resource>:<action>` token for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlatformViewMetrics => "platform:view_metrics",
            Self::PlatformManageBusinesses => "platform:manage_businesses",
            Self::PlatformManagePlans => "platform:manage_plans",
            Self::PlatformManageRules => "platform:manage_rules",
            Self::BusinessView => "business:view",
            Self::BusinessCreate => "business:create",
            Self::BusinessEdit => "business:edit",
            Self::BusinessDelete => "business:delete",
            Self::BusinessSettings => "business:settings",
            Self::UserView => "user:view",
            Self::UserCreate => "user:create",
            Self::UserEdit => "user:edit",
            Self::UserDelete => "user:delete",
            Self::AppointmentView => "appointment:view",
            Self::AppointmentViewOwn => "appointment:view_own",
            Self::AppointmentCreate => "appointment:create",
            Self::AppointmentEdit => "appointment:edit",
            Self::AppointmentCancel => "appointment:cancel",
            Self::AppointmentComplete => "appointment:complete",
            Self::AppointmentDelete => "appointment:delete",
            Self::ClientView => "client:view",
            Self::ClientCreate => "client:create",
            Self::ClientEdit => "client:edit",
            Self::ClientDelete => "client:delete",
            Self::ClientHistory => "client:history",
            Self::ServiceView => "service:view",
            Self::ServiceCreate => "service:create",
            Self::ServiceEdit => "service:edit",
            Self::ServiceDelete => "service:delete",
            Self::StaffView => "staff:view",
            Self::StaffCreate => "staff:create",
            Self::StaffEdit => "staff:edit",
            Self::StaffDelete => "staff:delete",
            Self::StaffSchedule => "staff:schedule",
            Self::ScheduleView => "schedule:view",
            Self::ScheduleEdit => "schedule:edit",
            Self::BillingView => "billing:view",
            Self::BillingManage => "billing:manage",
            Self::SubscriptionView => "subscription:view",
            Self::SubscriptionManage => "subscription:manage",
            Self::PaymentView => "payment:view",
            Self::PaymentProcess => "payment:process",
            Self::PaymentRefund => "payment:refund",
            Self::ReportView => "report:view",
            Self::ReportExport => "report:export",
            Self::CommissionView => "commission:view",
            Self::CommissionViewOwn => "commission:view_own",
            Self::CommissionManage => "commission:manage",
            Self::ProductView => "product:view",
            Self::ProductManage => "product:manage",
            Self::ProfileView => "profile:view",
            Self::ProfileEdit => "profile:edit",
        }
    }

    /// Returns the resource half of the token (`appointment` for
    /// `appointment:create`).
    #[must_use]
    pub fn resource(&self) -> &'static str {
        self.as_str()
            .split_once(':')
            .map(|(resource, _)| resource)
            .unwrap_or_default()
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::PlatformViewMetrics,
            Permission::PlatformManageBusinesses,
            Permission::PlatformManagePlans,
            Permission::PlatformManageRules,
            Permission::BusinessView,
            Permission::BusinessCreate,
            Permission::BusinessEdit,
            Permission::BusinessDelete,
            Permission::BusinessSettings,
            Permission::UserView,
            Permission::UserCreate,
            Permission::UserEdit,
            Permission::UserDelete,
            Permission::AppointmentView,
            Permission::AppointmentViewOwn,
            Permission::AppointmentCreate,
            Permission::AppointmentEdit,
            Permission::AppointmentCancel,
            Permission::AppointmentComplete,
            Permission::AppointmentDelete,
            Permission::ClientView,
            Permission::ClientCreate,
            Permission::ClientEdit,
            Permission::ClientDelete,
            Permission::ClientHistory,
            Permission::ServiceView,
            Permission::ServiceCreate,
            Permission::ServiceEdit,
            Permission::ServiceDelete,
            Permission::StaffView,
            Permission::StaffCreate,
            Permission::StaffEdit,
            Permission::StaffDelete,
            Permission::StaffSchedule,
            Permission::ScheduleView,
            Permission::ScheduleEdit,
            Permission::BillingView,
            Permission::BillingManage,
            Permission::SubscriptionView,
            Permission::SubscriptionManage,
            Permission::PaymentView,
            Permission::PaymentProcess,
            Permission::PaymentRefund,
            Permission::ReportView,
            Permission::ReportExport,
            Permission::CommissionView,
            Permission::CommissionViewOwn,
            Permission::CommissionManage,
            Permission::ProductView,
            Permission::ProductManage,
            Permission::ProfileView,
            Permission::ProfileEdit,
        ];

        ALL
    }

    /// Parses a transport value into a permission.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown permission value '{value}'")))
    }
}

impl TryFrom<String> for Permission {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(value.as_str())
    }
}

impl From<Permission> for &'static str {
    fn from(value: Permission) -> Self {
        value.as_str()
    }
}

impl Display for Permission {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}
