//! Navigation table and per-role capability sets.

use serde::Serialize;

use crate::{Role, RoleSet, policy::is_allowed};

/// A navigable, role-gated section of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub name: &'static str,
    pub path: &'static str,
    pub allowed: RoleSet,
}

impl NavItem {
    /// Should the sidebar highlight this entry for `current`?
    ///
    /// The root entry only matches itself; other entries match any path that
    /// starts with their own.
    pub fn is_active(&self, current: &str) -> bool {
        current == self.path || (self.path != "/" && current.starts_with(self.path))
    }

    /// Is `path` this section or one of its sub-pages?
    ///
    /// Matches whole segments only: `/users/42` is inside `/users`,
    /// `/usersettings` is not.
    pub fn contains(&self, path: &str) -> bool {
        if path == self.path {
            return true;
        }
        self.path != "/"
            && path
                .strip_prefix(self.path)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

const ALL: RoleSet = RoleSet::ALL;
const MANAGEMENT: RoleSet = RoleSet::of(&[Role::SuperAdmin, Role::Admin]);
const SUPPORT: RoleSet = RoleSet::of(&[Role::SuperAdmin, Role::SupportAdmin]);

/// The console's sections, in sidebar order.
pub const NAVIGATION: [NavItem; 5] = [
    NavItem { name: "Dashboard", path: "/", allowed: ALL },
    NavItem { name: "User Management", path: "/users", allowed: MANAGEMENT },
    NavItem { name: "Services", path: "/services", allowed: MANAGEMENT },
    NavItem { name: "Ticket & Complains", path: "/complaints", allowed: ALL },
    NavItem { name: "Live Chat", path: "/chat", allowed: SUPPORT },
];

/// Where a requested path leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Reachable without a session (the login entry point).
    Public(&'static str),
    /// A gated section.
    Protected(NavItem),
    /// Nothing matches.
    Unknown,
}

/// Lookup from paths to gated sections.
#[derive(Debug, Clone)]
pub struct RouteTable {
    items: Vec<NavItem>,
    public: Vec<&'static str>,
}

impl RouteTable {
    pub fn new(
        items: impl IntoIterator<Item = NavItem>,
        public: impl IntoIterator<Item = &'static str>,
    ) -> Self {
        Self {
            items: items.into_iter().collect(),
            public: public.into_iter().collect(),
        }
    }

    /// The console's own table: [`NAVIGATION`] plus `/login`.
    pub fn console() -> Self {
        Self::new(NAVIGATION, ["/login"])
    }

    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    /// Resolve a path; the longest matching section wins.
    pub fn resolve(&self, path: &str) -> Destination {
        if let Some(public) = self.public.iter().find(|p| **p == path) {
            return Destination::Public(*public);
        }
        self.items
            .iter()
            .filter(|item| item.contains(path))
            .max_by_key(|item| item.path.len())
            .map(|item| Destination::Protected(*item))
            .unwrap_or(Destination::Unknown)
    }

    /// Sections a role may see, in table order. Nothing for the absent role.
    pub fn visible_for(&self, role: Option<Role>) -> Vec<NavItem> {
        self.items
            .iter()
            .filter(|item| is_allowed(role, item.allowed))
            .copied()
            .collect()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::console()
    }
}

/// Everything a role may do in the shell, computed once per render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub role: Option<Role>,
    pub navigation: Vec<NavItem>,
    pub system_settings: bool,
}

impl Capabilities {
    pub fn for_role(role: Option<Role>, table: &RouteTable) -> Self {
        Self {
            role,
            navigation: table.visible_for(role),
            system_settings: role == Some(Role::SuperAdmin),
        }
    }

    pub fn can_open(&self, path: &str) -> bool {
        self.navigation.iter().any(|item| item.contains(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[NavItem]) -> Vec<&'static str> {
        items.iter().map(|i| i.name).collect()
    }

    #[test]
    fn sidebar_per_role() {
        let table = RouteTable::console();
        assert_eq!(
            names(&table.visible_for(Some(Role::SuperAdmin))),
            ["Dashboard", "User Management", "Services", "Ticket & Complains", "Live Chat"]
        );
        assert_eq!(
            names(&table.visible_for(Some(Role::Admin))),
            ["Dashboard", "User Management", "Services", "Ticket & Complains"]
        );
        assert_eq!(
            names(&table.visible_for(Some(Role::SupportAdmin))),
            ["Dashboard", "Ticket & Complains", "Live Chat"]
        );
        assert!(table.visible_for(None).is_empty());
    }

    #[test]
    fn active_matching() {
        let dashboard = NAVIGATION[0];
        let users = NAVIGATION[1];
        assert!(dashboard.is_active("/"));
        assert!(!dashboard.is_active("/users"));
        assert!(users.is_active("/users"));
        assert!(users.is_active("/users/42"));
        assert!(!users.is_active("/services"));
    }

    #[test]
    fn sections_contain_whole_segments_only() {
        let dashboard = NAVIGATION[0];
        let users = NAVIGATION[1];
        assert!(users.contains("/users"));
        assert!(users.contains("/users/42"));
        assert!(!users.contains("/usersettings"));
        assert!(dashboard.contains("/"));
        assert!(!dashboard.contains("/users"));
    }

    #[test]
    fn resolve_prefers_longest_match() {
        let table = RouteTable::console();
        assert_eq!(table.resolve("/login"), Destination::Public("/login"));
        assert_eq!(table.resolve("/"), Destination::Protected(NAVIGATION[0]));
        assert_eq!(
            table.resolve("/complaints/CMP-1029"),
            Destination::Protected(NAVIGATION[3])
        );
        assert_eq!(table.resolve("/nowhere"), Destination::Unknown);
        assert_eq!(table.resolve("/usersettings"), Destination::Unknown);
        assert_eq!(table.resolve("/chatroom"), Destination::Unknown);
    }

    #[test]
    fn settings_only_for_super_admin() {
        let table = RouteTable::console();
        assert!(Capabilities::for_role(Some(Role::SuperAdmin), &table).system_settings);
        assert!(!Capabilities::for_role(Some(Role::Admin), &table).system_settings);
        assert!(!Capabilities::for_role(None, &table).system_settings);

        let support = Capabilities::for_role(Some(Role::SupportAdmin), &table);
        assert!(support.can_open("/chat"));
        assert!(!support.can_open("/users"));
        assert!(!support.can_open("/chatroom"));
    }
}
