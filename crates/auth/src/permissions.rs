use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Capability token checked before gating a screen or an action.
///
/// Flat: no permission implies another. The wire form is snake_case
/// (e.g. `manage_inventory`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageUsers,
    ViewDonors,
    ManageDonors,
    ViewInventory,
    ManageInventory,
    ViewCampaigns,
    ManageCampaigns,
    RegisterForCampaigns,
    ViewHospitals,
    ManageHospitals,
    ViewRecipients,
    ManageRecipients,
    ViewRequests,
    CreateRequests,
    ManageRequests,
    ViewReports,
    SendNotifications,
    ManageSettings,
    ViewDonationHistory,
    ViewOwnProfile,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown permission '{0}'")]
pub struct ParsePermissionError(pub String);

impl Permission {
    pub const ALL: [Permission; 20] = [
        Permission::ManageUsers,
        Permission::ViewDonors,
        Permission::ManageDonors,
        Permission::ViewInventory,
        Permission::ManageInventory,
        Permission::ViewCampaigns,
        Permission::ManageCampaigns,
        Permission::RegisterForCampaigns,
        Permission::ViewHospitals,
        Permission::ManageHospitals,
        Permission::ViewRecipients,
        Permission::ManageRecipients,
        Permission::ViewRequests,
        Permission::CreateRequests,
        Permission::ManageRequests,
        Permission::ViewReports,
        Permission::SendNotifications,
        Permission::ManageSettings,
        Permission::ViewDonationHistory,
        Permission::ViewOwnProfile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ManageUsers => "manage_users",
            Permission::ViewDonors => "view_donors",
            Permission::ManageDonors => "manage_donors",
            Permission::ViewInventory => "view_inventory",
            Permission::ManageInventory => "manage_inventory",
            Permission::ViewCampaigns => "view_campaigns",
            Permission::ManageCampaigns => "manage_campaigns",
            Permission::RegisterForCampaigns => "register_for_campaigns",
            Permission::ViewHospitals => "view_hospitals",
            Permission::ManageHospitals => "manage_hospitals",
            Permission::ViewRecipients => "view_recipients",
            Permission::ManageRecipients => "manage_recipients",
            Permission::ViewRequests => "view_requests",
            Permission::CreateRequests => "create_requests",
            Permission::ManageRequests => "manage_requests",
            Permission::ViewReports => "view_reports",
            Permission::SendNotifications => "send_notifications",
            Permission::ManageSettings => "manage_settings",
            Permission::ViewDonationHistory => "view_donation_history",
            Permission::ViewOwnProfile => "view_own_profile",
        }
    }

    /// Resource area the permission belongs to (used to group the settings UI).
    pub fn category(&self) -> &'static str {
        match self {
            Permission::ManageUsers => "users",
            Permission::ViewDonors | Permission::ManageDonors | Permission::ViewDonationHistory => {
                "donors"
            }
            Permission::ViewInventory | Permission::ManageInventory => "inventory",
            Permission::ViewCampaigns
            | Permission::ManageCampaigns
            | Permission::RegisterForCampaigns => "campaigns",
            Permission::ViewHospitals | Permission::ManageHospitals => "hospitals",
            Permission::ViewRecipients | Permission::ManageRecipients => "recipients",
            Permission::ViewRequests | Permission::CreateRequests | Permission::ManageRequests => {
                "requests"
            }
            Permission::ViewReports => "reports",
            Permission::SendNotifications => "notifications",
            Permission::ManageSettings | Permission::ViewOwnProfile => "system",
        }
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = ParsePermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParsePermissionError(s.to_string()))
    }
}
