//! `emberpos-notifications`: back-office notification records and the
//! email-trigger client.

pub mod email;
pub mod notification;

pub use email::{EmailError, EmailTrigger};
pub use notification::{Notification, NotificationKind};
