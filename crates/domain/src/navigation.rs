use serde::Serialize;

use crate::{Role, UserStatus, can_access_route};

/// One entry of a role's navigation menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationItem {
    /// Menu label.
    pub label: &'static str,
    /// Target path.
    pub path: &'static str,
    /// Icon name understood by the clients.
    pub icon: &'static str,
}

const fn item(label: &'static str, path: &'static str, icon: &'static str) -> NavigationItem {
    NavigationItem { label, path, icon }
}

const OWNER_MENU: &[NavigationItem] = &[
    item("Dashboard", "/owner/dashboard", "dashboard"),
    item("Businesses", "/owner/businesses", "store"),
    item("Plans", "/owner/plans", "credit-card"),
    item("Rule templates", "/owner/rules", "rule"),
    item("Reports", "/owner/reports", "chart"),
    item("Profile", "/profile", "user"),
];

const BUSINESS_MENU: &[NavigationItem] = &[
    item("Dashboard", "/dashboard", "dashboard"),
    item("Appointments", "/appointments", "calendar"),
    item("Clients", "/clients", "users"),
    item("Staff", "/business/staff", "scissors"),
    item("Services", "/business/services", "sparkles"),
    item("Payments", "/payments", "cash"),
    item("Commissions", "/business/commissions", "percent"),
    item("Inventory", "/business/inventory", "box"),
    item("Reports", "/business/reports", "chart"),
    item("Billing", "/business/billing", "receipt"),
    item("Subscription", "/business/subscription", "credit-card"),
    item("Settings", "/business/settings", "settings"),
];

const BUSINESS_SPECIALIST_MENU: &[NavigationItem] = &[
    item("Dashboard", "/dashboard", "dashboard"),
    item("My agenda", "/specialist/agenda", "calendar-user"),
    item("Appointments", "/appointments", "calendar"),
    item("Clients", "/clients", "users"),
    item("Staff", "/business/staff", "scissors"),
    item("Services", "/business/services", "sparkles"),
    item("Payments", "/payments", "cash"),
    item("Commissions", "/business/commissions", "percent"),
    item("My commissions", "/specialist/commissions", "wallet"),
    item("Inventory", "/business/inventory", "box"),
    item("Reports", "/business/reports", "chart"),
    item("Billing", "/business/billing", "receipt"),
    item("Subscription", "/business/subscription", "credit-card"),
    item("Settings", "/business/settings", "settings"),
];

const RECEPTIONIST_SPECIALIST_MENU: &[NavigationItem] = &[
    item("Agenda", "/receptionist/agenda", "calendar"),
    item("My agenda", "/specialist/agenda", "calendar-user"),
    item("Appointments", "/appointments", "calendar"),
    item("Clients", "/clients", "users"),
    item("Services", "/business/services", "sparkles"),
    item("Payments", "/payments", "cash"),
    item("My commissions", "/specialist/commissions", "wallet"),
    item("Profile", "/profile", "user"),
];

const RECEPTIONIST_MENU: &[NavigationItem] = &[
    item("Agenda", "/receptionist/agenda", "calendar"),
    item("Appointments", "/appointments", "calendar"),
    item("Clients", "/clients", "users"),
    item("Services", "/business/services", "sparkles"),
    item("Payments", "/payments", "cash"),
    item("Profile", "/profile", "user"),
];

const SPECIALIST_MENU: &[NavigationItem] = &[
    item("My agenda", "/specialist/agenda", "calendar-user"),
    item("Clients", "/clients", "users"),
    item("My commissions", "/specialist/commissions", "wallet"),
    item("Profile", "/profile", "user"),
];

const CLIENT_MENU: &[NavigationItem] = &[
    item("My appointments", "/client/appointments", "calendar"),
    item("Book", "/client/book", "plus"),
    item("Profile", "/profile", "user"),
];

/// Navigation menu per role.
pub const NAVIGATION_MENUS: &[(Role, &[NavigationItem])] = &[
    (Role::Owner, OWNER_MENU),
    (Role::Business, BUSINESS_MENU),
    (Role::BusinessSpecialist, BUSINESS_SPECIALIST_MENU),
    (Role::ReceptionistSpecialist, RECEPTIONIST_SPECIALIST_MENU),
    (Role::Receptionist, RECEPTIONIST_MENU),
    (Role::Specialist, SPECIALIST_MENU),
    (Role::Client, CLIENT_MENU),
];

/// Returns the full static menu of a role.
#[must_use]
pub fn navigation_for_role(role: Role) -> &'static [NavigationItem] {
    NAVIGATION_MENUS
        .iter()
        .find(|(candidate, _)| *candidate == role)
        .map(|(_, items)| *items)
        .unwrap_or(&[])
}

/// Returns the menu entries the user can actually open.
#[must_use]
pub fn visible_navigation(role: Role, status: UserStatus) -> Vec<NavigationItem> {
    navigation_for_role(role)
        .iter()
        .filter(|item| can_access_route(item.path, Some(role), true, status))
        .copied()
        .collect()
}
