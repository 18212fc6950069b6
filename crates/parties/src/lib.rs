//! `emberpos-parties`: supplier and delivery-staff directory records.

pub mod party;

pub use party::{ContactInfo, Party, PartyKind, PartyStatus};
