//! Static route table: dashboard screens and the permissions that open them.

use serde::{Deserialize, Serialize};

use crate::Permission;

/// Navigable dashboard screen.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteId {
    Dashboard,
    Donors,
    DonorProfile,
    DonationHistory,
    Inventory,
    InventoryStats,
    Campaigns,
    Hospitals,
    Recipients,
    Requests,
    Notifications,
    Users,
    Reports,
    Settings,
    Profile,
}

impl RouteId {
    pub const ALL: [RouteId; 15] = [
        RouteId::Dashboard,
        RouteId::Donors,
        RouteId::DonorProfile,
        RouteId::DonationHistory,
        RouteId::Inventory,
        RouteId::InventoryStats,
        RouteId::Campaigns,
        RouteId::Hospitals,
        RouteId::Recipients,
        RouteId::Requests,
        RouteId::Notifications,
        RouteId::Users,
        RouteId::Reports,
        RouteId::Settings,
        RouteId::Profile,
    ];

    /// Path pattern; `:name` segments match any single non-empty segment.
    pub fn path(&self) -> &'static str {
        match self {
            RouteId::Dashboard => "/dashboard",
            RouteId::Donors => "/donors",
            RouteId::DonorProfile => "/donors/:id",
            RouteId::DonationHistory => "/donations/history",
            RouteId::Inventory => "/inventory",
            RouteId::InventoryStats => "/inventory/stats",
            RouteId::Campaigns => "/campaigns",
            RouteId::Hospitals => "/hospitals",
            RouteId::Recipients => "/recipients",
            RouteId::Requests => "/requests",
            RouteId::Notifications => "/notifications",
            RouteId::Users => "/users",
            RouteId::Reports => "/reports",
            RouteId::Settings => "/settings",
            RouteId::Profile => "/profile",
        }
    }

    /// Permissions of which any one opens the route. Empty = any signed-in role.
    pub fn required_permissions(&self) -> &'static [Permission] {
        use Permission::*;

        match self {
            RouteId::Dashboard | RouteId::Notifications | RouteId::Profile => &[],
            RouteId::Donors => &[ViewDonors, ManageDonors],
            RouteId::DonorProfile => &[ViewDonors, ManageDonors],
            RouteId::DonationHistory => &[ViewDonationHistory],
            RouteId::Inventory => &[ViewInventory, ManageInventory],
            RouteId::InventoryStats => &[ViewInventory],
            RouteId::Campaigns => &[ViewCampaigns, ManageCampaigns],
            RouteId::Hospitals => &[ViewHospitals, ManageHospitals],
            RouteId::Recipients => &[ViewRecipients, ManageRecipients],
            RouteId::Requests => &[ViewRequests, ManageRequests],
            RouteId::Users => &[ManageUsers],
            RouteId::Reports => &[ViewReports],
            RouteId::Settings => &[ManageSettings],
        }
    }

    /// Resolve a concrete location (`/donors/42?tab=history`) to its route.
    ///
    /// Literal patterns win over parameterised ones, so `/inventory/stats` is
    /// never read as an inventory id.
    pub fn from_path(location: &str) -> Option<RouteId> {
        let path = location.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let matches = |route: &RouteId| {
            let pattern: Vec<&str> = route.path().split('/').filter(|s| !s.is_empty()).collect();
            pattern.len() == segments.len()
                && pattern
                    .iter()
                    .zip(&segments)
                    .all(|(p, s)| p.starts_with(':') || p == s)
        };

        RouteId::ALL
            .iter()
            .filter(|r| !r.path().contains(':'))
            .chain(RouteId::ALL.iter().filter(|r| r.path().contains(':')))
            .copied()
            .find(|r| matches(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_literal_paths() {
        assert_eq!(RouteId::from_path("/inventory"), Some(RouteId::Inventory));
        assert_eq!(RouteId::from_path("/inventory/stats"), Some(RouteId::InventoryStats));
        assert_eq!(RouteId::from_path("/users/"), Some(RouteId::Users));
    }

    #[test]
    fn resolves_parameterised_paths() {
        assert_eq!(RouteId::from_path("/donors/64f1c0ffee"), Some(RouteId::DonorProfile));
        assert_eq!(
            RouteId::from_path("/donors/64f1c0ffee?tab=history"),
            Some(RouteId::DonorProfile)
        );
    }

    #[test]
    fn unknown_paths_resolve_to_none() {
        assert_eq!(RouteId::from_path("/"), None);
        assert_eq!(RouteId::from_path("/donors/1/edit"), None);
        assert_eq!(RouteId::from_path("/billing"), None);
    }

    #[test]
    fn every_route_resolves_from_its_own_path() {
        for route in RouteId::ALL {
            let concrete = route.path().replace(":id", "abc123");
            assert_eq!(RouteId::from_path(&concrete), Some(route));
        }
    }
}
