//! Static role → permission catalog.
//!
//! Every role lists its permissions explicitly. Roles are hierarchical but
//! the sets do not inherit from one another; a permission granted to two
//! roles appears in both lists.

use crate::{Permission, Role};

use Permission::*;

const OWNER_PERMISSIONS: &[Permission] = &[
    PlatformViewMetrics,
    PlatformManageBusinesses,
    PlatformManagePlans,
    PlatformManageRules,
    BusinessView,
    BusinessCreate,
    BusinessEdit,
    BusinessDelete,
    UserView,
    UserCreate,
    UserEdit,
    UserDelete,
    BillingView,
    SubscriptionView,
    SubscriptionManage,
    PaymentView,
    PaymentRefund,
    ReportView,
    ReportExport,
    ProfileView,
    ProfileEdit,
];

const BUSINESS_PERMISSIONS: &[Permission] = &[
    BusinessView,
    BusinessEdit,
    BusinessSettings,
    UserView,
    UserCreate,
    UserEdit,
    UserDelete,
    AppointmentView,
    AppointmentCreate,
    AppointmentEdit,
    AppointmentCancel,
    AppointmentComplete,
    AppointmentDelete,
    ClientView,
    ClientCreate,
    ClientEdit,
    ClientDelete,
    ClientHistory,
    ServiceView,
    ServiceCreate,
    ServiceEdit,
    ServiceDelete,
    StaffView,
    StaffCreate,
    StaffEdit,
    StaffDelete,
    StaffSchedule,
    ScheduleView,
    ScheduleEdit,
    BillingView,
    BillingManage,
    SubscriptionView,
    SubscriptionManage,
    PaymentView,
    PaymentProcess,
    PaymentRefund,
    ReportView,
    ReportExport,
    CommissionView,
    CommissionManage,
    ProductView,
    ProductManage,
    ProfileView,
    ProfileEdit,
];

const BUSINESS_SPECIALIST_PERMISSIONS: &[Permission] = &[
    BusinessView,
    BusinessEdit,
    BusinessSettings,
    UserView,
    UserCreate,
    UserEdit,
    UserDelete,
    AppointmentView,
    AppointmentViewOwn,
    AppointmentCreate,
    AppointmentEdit,
    AppointmentCancel,
    AppointmentComplete,
    AppointmentDelete,
    ClientView,
    ClientCreate,
    ClientEdit,
    ClientDelete,
    ClientHistory,
    ServiceView,
    ServiceCreate,
    ServiceEdit,
    ServiceDelete,
    StaffView,
    StaffCreate,
    StaffEdit,
    StaffDelete,
    StaffSchedule,
    ScheduleView,
    ScheduleEdit,
    BillingView,
    BillingManage,
    SubscriptionView,
    SubscriptionManage,
    PaymentView,
    PaymentProcess,
    PaymentRefund,
    ReportView,
    ReportExport,
    CommissionView,
    CommissionViewOwn,
    CommissionManage,
    ProductView,
    ProductManage,
    ProfileView,
    ProfileEdit,
];

const RECEPTIONIST_SPECIALIST_PERMISSIONS: &[Permission] = &[
    AppointmentView,
    AppointmentViewOwn,
    AppointmentCreate,
    AppointmentEdit,
    AppointmentCancel,
    AppointmentComplete,
    ClientView,
    ClientCreate,
    ClientEdit,
    ClientHistory,
    ServiceView,
    StaffView,
    ScheduleView,
    PaymentView,
    PaymentProcess,
    CommissionViewOwn,
    ProductView,
    ProfileView,
    ProfileEdit,
];

const RECEPTIONIST_PERMISSIONS: &[Permission] = &[
    AppointmentView,
    AppointmentCreate,
    AppointmentEdit,
    AppointmentCancel,
    ClientView,
    ClientCreate,
    ClientEdit,
    ServiceView,
    StaffView,
    ScheduleView,
    PaymentView,
    PaymentProcess,
    ProductView,
    ProfileView,
    ProfileEdit,
];

const SPECIALIST_PERMISSIONS: &[Permission] = &[
    AppointmentViewOwn,
    AppointmentComplete,
    ClientView,
    ClientHistory,
    ServiceView,
    ScheduleView,
    CommissionViewOwn,
    ProfileView,
    ProfileEdit,
];

const CLIENT_PERMISSIONS: &[Permission] = &[
    AppointmentViewOwn,
    AppointmentCreate,
    AppointmentCancel,
    ServiceView,
    ProfileView,
    ProfileEdit,
];

/// Role → permission-set table. Exactly one row per role.
pub const ROLE_PERMISSIONS: &[(Role, &[Permission])] = &[
    (Role::Owner, OWNER_PERMISSIONS),
    (Role::Business, BUSINESS_PERMISSIONS),
    (Role::BusinessSpecialist, BUSINESS_SPECIALIST_PERMISSIONS),
    (Role::ReceptionistSpecialist, RECEPTIONIST_SPECIALIST_PERMISSIONS),
    (Role::Receptionist, RECEPTIONIST_PERMISSIONS),
    (Role::Specialist, SPECIALIST_PERMISSIONS),
    (Role::Client, CLIENT_PERMISSIONS),
];

/// Returns the ordered permission set of a role, or an empty slice when the
/// role has no catalog row.
#[must_use]
pub fn permissions_for_role(role: Role) -> &'static [Permission] {
    ROLE_PERMISSIONS
        .iter()
        .find(|(candidate, _)| *candidate == role)
        .map(|(_, permissions)| *permissions)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::{Permission, Role};

    use super::{ROLE_PERMISSIONS, permissions_for_role};

    #[test]
    fn every_role_has_exactly_one_row() {
        for role in Role::all() {
            let rows = ROLE_PERMISSIONS
                .iter()
                .filter(|(candidate, _)| candidate == role)
                .count();
            assert_eq!(rows, 1, "{role} must appear once in the catalog");
        }
        assert_eq!(ROLE_PERMISSIONS.len(), Role::all().len());
    }

    #[test]
    fn permission_sets_have_no_duplicates() {
        for (role, permissions) in ROLE_PERMISSIONS {
            let unique: HashSet<_> = permissions.iter().collect();
            assert_eq!(unique.len(), permissions.len(), "{role} lists a duplicate");
        }
    }

    #[test]
    fn hybrid_roles_cover_both_halves_where_it_matters() {
        let receptionist_specialist = permissions_for_role(Role::ReceptionistSpecialist);
        assert!(receptionist_specialist.contains(&Permission::AppointmentView));
        assert!(receptionist_specialist.contains(&Permission::AppointmentViewOwn));
        assert!(receptionist_specialist.contains(&Permission::CommissionViewOwn));

        let business_specialist = permissions_for_role(Role::BusinessSpecialist);
        assert!(business_specialist.contains(&Permission::BusinessSettings));
        assert!(business_specialist.contains(&Permission::AppointmentViewOwn));
    }

    #[test]
    fn platform_permissions_belong_to_owner_only() {
        for (role, permissions) in ROLE_PERMISSIONS {
            let has_platform = permissions
                .iter()
                .any(|permission| permission.resource() == "platform");
            assert_eq!(has_platform, *role == Role::Owner, "{role}");
        }
    }
}
