//! Role names and the role → capability table.
//!
//! Roles are an open set: anything the backend hands out is accepted, and a
//! role missing from a capability's allow-list simply lacks that capability.

pub const SUPERADMIN: &str = "superadmin";
pub const ADMIN: &str = "admin";
pub const EDITOR: &str = "editor";
pub const VIEWER: &str = "viewer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Add products and record sales.
    AddEdit,
    /// Delete history entries.
    Delete,
    ManageUsers,
}

impl Capability {
    pub const ALL: [Capability; 3] = [Capability::AddEdit, Capability::Delete, Capability::ManageUsers];

    pub fn allowed_roles(self) -> &'static [&'static str] {
        match self {
            Capability::AddEdit => &[SUPERADMIN, ADMIN, EDITOR],
            Capability::Delete => &[SUPERADMIN, ADMIN],
            Capability::ManageUsers => &[SUPERADMIN],
        }
    }

    pub fn permits(self, role: &str) -> bool {
        self.allowed_roles().contains(&role)
    }

    pub fn label(self) -> &'static str {
        match self {
            Capability::AddEdit => "add_edit",
            Capability::Delete => "delete",
            Capability::ManageUsers => "manage_users",
        }
    }
}

/// Capabilities held by `role`, in table order.
pub fn capabilities_for(role: &str) -> Vec<Capability> {
    Capability::ALL.iter().copied().filter(|c| c.permits(role)).collect()
}
