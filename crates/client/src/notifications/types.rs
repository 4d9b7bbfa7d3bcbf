use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bloodbank_core::{Entity, NotificationId};

/// Category of a notification; also drives toast styling.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Positive outcome of a user action.
    Success,
    /// A failure the user should see.
    Error,
    /// Non-critical issue.
    Warning,
    /// Neutral information.
    Info,
    BloodRequest,
    DonationReminder,
    CampaignUpdate,
    InventoryAlert,
    System,
    /// Any category this client doesn't know yet.
    #[serde(other)]
    Other,
}

impl NotificationKind {
    /// Kinds produced locally as transient toasts.
    pub fn is_toast_kind(&self) -> bool {
        matches!(self, Self::Success | Self::Error | Self::Warning | Self::Info)
    }
}

/// Per-channel delivery flags reported by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeliveryStatus {
    pub sms: bool,
    pub email: bool,
    pub in_app: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(alias = "_id")]
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default)]
    pub title: String,
    pub message: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    is_read: bool,
    #[serde(default)]
    pub delivery: DeliveryStatus,
    /// Created locally by a toast helper; never persisted server-side.
    #[serde(skip)]
    ephemeral: bool,
}

impl Notification {
    /// Client-side toast with a fresh id.
    pub fn toast(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            id: NotificationId::generate(),
            kind,
            title: String::new(),
            message: message.into(),
            created_at: Utc::now(),
            is_read: false,
            delivery: DeliveryStatus {
                in_app: true,
                ..DeliveryStatus::default()
            },
            ephemeral: true,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn is_read(&self) -> bool {
        self.is_read
    }

    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    /// Returns true if the flag flipped.
    pub fn mark_read(&mut self) -> bool {
        !std::mem::replace(&mut self.is_read, true)
    }
}

impl Entity for Notification {
    type Id = NotificationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Server-side list filters; `None` means "not filtered".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFilters {
    pub kind: Option<NotificationKind>,
    pub is_read: Option<bool>,
    pub search: Option<String>,
}

impl NotificationFilters {
    /// Overlay the fields set in `patch`.
    pub fn merge(&mut self, patch: NotificationFilters) {
        if patch.kind.is_some() {
            self.kind = patch.kind;
        }
        if patch.is_read.is_some() {
            self.is_read = patch.is_read;
        }
        if patch.search.is_some() {
            self.search = patch.search.filter(|s| !s.trim().is_empty());
        }
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(kind) = self.kind {
            // Serialises as a bare string for unit variants.
            if let Ok(serde_json::Value::String(s)) = serde_json::to_value(kind) {
                params.push(("type".to_string(), s));
            }
        }
        if let Some(is_read) = self.is_read {
            params.push(("isRead".to_string(), is_read.to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("search".to_string(), search.clone()));
        }
        params
    }
}
