use serde::Serialize;

use crate::identity::{Capability, SessionAuthority};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
    /// `None`: visible to everyone who can see the bar.
    pub requires: Option<Capability>,
}

pub const BRAND: &str = "Inventory Dashboard";

pub const DEFAULT_ITEMS: [NavItem; 5] = [
    NavItem { label: "Dashboard", href: "/", requires: None },
    NavItem { label: "Add Product", href: "/add", requires: Some(Capability::AddEdit) },
    NavItem { label: "Sell Product", href: "/sell", requires: Some(Capability::AddEdit) },
    NavItem { label: "Daily History", href: "/daily-history", requires: None },
    NavItem { label: "Users", href: "/users", requires: Some(Capability::ManageUsers) },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedItem {
    pub label: String,
    pub href: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedNav {
    pub brand: String,
    pub username: Option<String>,
    pub role: Option<String>,
    pub items: Vec<RenderedItem>,
}

#[derive(Debug, Clone)]
pub struct NavMenu {
    items: Vec<NavItem>,
}

impl Default for NavMenu {
    fn default() -> Self { Self { items: DEFAULT_ITEMS.to_vec() } }
}

impl NavMenu {
    pub fn new(items: Vec<NavItem>) -> Self { Self { items } }

    /// Items visible to the current session, with the one matching
    /// `current_path` marked active. Capabilities are re-read on each call.
    pub fn render(&self, authority: &SessionAuthority, current_path: &str) -> RenderedNav {
        let user = authority.get_user();
        let items = self
            .items
            .iter()
            .filter(|it| it.requires.map_or(true, |cap| authority.can(cap)))
            .map(|it| RenderedItem { label: it.label.to_string(), href: it.href.to_string(), active: it.href == current_path })
            .collect();
        RenderedNav {
            brand: BRAND.to_string(),
            username: user.as_ref().map(|u| u.username.clone()),
            role: user.map(|u| u.role),
            items,
        }
    }
}
