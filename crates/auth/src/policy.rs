//! Compiled-in role → permission table.

use std::collections::{BTreeMap, BTreeSet};

use crate::{Permission, Role};

/// What a role is allowed to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    /// Wildcard: every permission, including ones added after this build.
    All,
    /// An explicit, finite set (possibly empty).
    Only(BTreeSet<Permission>),
}

impl Grant {
    pub fn none() -> Self {
        Grant::Only(BTreeSet::new())
    }

    pub fn allows(&self, permission: Permission) -> bool {
        match self {
            Grant::All => true,
            Grant::Only(set) => set.contains(&permission),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Grant::All)
    }
}

/// Immutable mapping from every [`Role`] to its [`Grant`].
///
/// Every role has an entry once built; roles not mentioned by the caller get an
/// empty grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePermissionMap {
    grants: BTreeMap<Role, Grant>,
}

impl RolePermissionMap {
    /// Build a map from explicit entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (Role, Grant)>) -> Self {
        let mut grants: BTreeMap<Role, Grant> = Role::ALL
            .into_iter()
            .map(|r| (r, Grant::none()))
            .collect();
        grants.extend(entries);
        Self { grants }
    }

    /// The dashboard's production table.
    pub fn standard() -> Self {
        use Permission::*;

        let only = |perms: &[Permission]| Grant::Only(perms.iter().copied().collect());

        Self::from_entries([
            (Role::Admin, Grant::All),
            (
                Role::HospitalStaff,
                only(&[
                    ViewDonors,
                    ViewInventory,
                    ManageInventory,
                    ViewCampaigns,
                    ViewHospitals,
                    ViewRecipients,
                    ManageRecipients,
                    ViewRequests,
                    CreateRequests,
                    ManageRequests,
                    ViewReports,
                    ViewOwnProfile,
                ]),
            ),
            (
                Role::Donor,
                only(&[
                    ViewCampaigns,
                    RegisterForCampaigns,
                    ViewDonationHistory,
                    ViewOwnProfile,
                ]),
            ),
            (
                Role::Recipient,
                only(&[ViewRequests, CreateRequests, ViewOwnProfile]),
            ),
        ])
    }

    pub fn grant(&self, role: Role) -> Option<&Grant> {
        self.grants.get(&role)
    }

    /// Effective permissions of a role, sorted (wildcard expands to all known).
    pub fn permissions_for(&self, role: Option<Role>) -> Vec<Permission> {
        match role.and_then(|r| self.grant(r)) {
            Some(Grant::All) => Permission::ALL.to_vec(),
            Some(Grant::Only(set)) => set.iter().copied().collect(),
            None => Vec::new(),
        }
    }
}

impl Default for RolePermissionMap {
    fn default() -> Self {
        Self::standard()
    }
}
