//! Role Registry Adapter

use crate::domain::{Address, Role};
use crate::ports::AccessControl;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

/// In-memory role membership.
#[derive(Default)]
pub struct RoleRegistry {
    members: RwLock<HashMap<Role, HashSet<Address>>>,
}

impl RoleRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with one member per role.
    pub fn with_members(admin: Address, pauser: Address, tss: Address) -> Self {
        let registry = Self::new();
        registry.grant(Role::Admin, admin);
        registry.grant(Role::Pauser, pauser);
        registry.grant(Role::Tss, tss);
        registry
    }

    /// Add `account` to `role`.
    pub fn grant(&self, role: Role, account: Address) {
        self.members.write().entry(role).or_default().insert(account);
    }

    /// Remove `account` from `role`.
    pub fn revoke(&self, role: Role, account: &Address) {
        if let Some(set) = self.members.write().get_mut(&role) {
            set.remove(account);
        }
    }
}

impl AccessControl for RoleRegistry {
    fn has_role(&self, role: Role, caller: &Address) -> bool {
        self.members
            .read()
            .get(&role)
            .is_some_and(|set| set.contains(caller))
    }
}
