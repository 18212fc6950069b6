use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use emberpos_core::{DomainError, DomainResult, NotificationId};

/// What a notification is about; drives the icon/badge in the back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Order,
    Inventory,
    System,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Order => "order",
            NotificationKind::Inventory => "inventory",
            NotificationKind::System => "system",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "order" => Ok(NotificationKind::Order),
            "inventory" => Ok(NotificationKind::Inventory),
            "system" => Ok(NotificationKind::System),
            _ => Err(DomainError::validation(format!(
                "unknown notification kind '{s}'"
            ))),
        }
    }
}

/// A back-office notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    kind: NotificationKind,
    title: String,
    body: String,
    read: bool,
    created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        id: NotificationId,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation("notification title cannot be empty"));
        }
        Ok(Self {
            id,
            kind,
            title,
            body: body.into(),
            read: false,
            created_at,
        })
    }

    /// Rehydrate a stored record.
    pub fn from_parts(
        id: NotificationId,
        kind: NotificationKind,
        title: String,
        body: String,
        read: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            title,
            body,
            read,
            created_at,
        }
    }

    pub fn id(&self) -> NotificationId {
        self.id
    }

    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_read(&self) -> bool {
        self.read
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn mark_read(&mut self) {
        self.read = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_notification_starts_unread() {
        let n = Notification::new(
            NotificationId::new(),
            NotificationKind::Order,
            "New order #42",
            "2x Family Feast",
            Utc::now(),
        )
        .unwrap();
        assert!(!n.is_read());
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = Notification::new(
            NotificationId::new(),
            NotificationKind::System,
            " ",
            "",
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn mark_read_is_idempotent() {
        let mut n = Notification::new(
            NotificationId::new(),
            NotificationKind::Inventory,
            "Low stock: Flour",
            "2.5 kg remaining",
            Utc::now(),
        )
        .unwrap();
        n.mark_read();
        n.mark_read();
        assert!(n.is_read());
    }
}
