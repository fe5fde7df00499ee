//! In-memory role provider

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::RwLock;

use qbridge_core::{Address, Role, RoleEffects};

/// Role grants held in memory. Interior mutability lets tests grant and revoke through a shared
/// `Arc` while ledgers hold the same handle.
#[derive(Debug, Default)]
pub struct InMemoryRoles {
    grants: RwLock<BTreeMap<Address, BTreeSet<Role>>>,
}

impl InMemoryRoles {
    /// No grants
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`grant`](Self::grant)
    pub fn with(self, identity: Address, role: Role) -> Self {
        self.grant(identity, role);
        self
    }

    /// Grant `role` to `identity`
    pub fn grant(&self, identity: Address, role: Role) {
        self.grants.write().entry(identity).or_default().insert(role);
    }

    /// Revoke `role` from `identity`
    pub fn revoke(&self, identity: &Address, role: Role) {
        if let Some(roles) = self.grants.write().get_mut(identity) {
            roles.remove(&role);
        }
    }

    /// Identities currently holding `role`
    pub fn holders(&self, role: Role) -> Vec<Address> {
        self.grants
            .read()
            .iter()
            .filter(|(_, roles)| roles.contains(&role))
            .map(|(identity, _)| *identity)
            .collect()
    }
}

impl RoleEffects for InMemoryRoles {
    fn has_role(&self, identity: &Address, role: Role) -> bool {
        self.grants
            .read()
            .get(identity)
            .is_some_and(|roles| roles.contains(&role))
    }
}
