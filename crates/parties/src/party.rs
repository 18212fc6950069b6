use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use emberpos_core::{DomainError, DomainResult, PartyId};

/// Party kind: supplier or delivery staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyKind {
    Supplier,
    DeliveryStaff,
}

impl PartyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PartyKind::Supplier => "supplier",
            PartyKind::DeliveryStaff => "delivery_staff",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "supplier" => Ok(PartyKind::Supplier),
            "delivery_staff" => Ok(PartyKind::DeliveryStaff),
            _ => Err(DomainError::validation(format!("unknown party kind '{s}'"))),
        }
    }
}

/// Party status lifecycle. Suspended records are flagged, never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyStatus {
    Active,
    Suspended,
}

/// Contact information for a party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A supplier or delivery-staff record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    id: PartyId,
    kind: PartyKind,
    name: String,
    contact: ContactInfo,
    status: PartyStatus,
    created_at: DateTime<Utc>,
}

impl Party {
    pub fn register(
        id: PartyId,
        kind: PartyKind,
        name: impl Into<String>,
        contact: ContactInfo,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("party name cannot be empty"));
        }
        Ok(Self {
            id,
            kind,
            name,
            contact,
            status: PartyStatus::Active,
            created_at,
        })
    }

    /// Rehydrate a stored record.
    pub fn from_parts(
        id: PartyId,
        kind: PartyKind,
        name: String,
        contact: ContactInfo,
        status: PartyStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            name,
            contact,
            status,
            created_at,
        }
    }

    pub fn id(&self) -> PartyId {
        self.id
    }

    pub fn kind(&self) -> PartyKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn status(&self) -> PartyStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_active(&self) -> bool {
        self.status == PartyStatus::Active
    }

    /// Update name and/or contact details; `None` keeps the existing value.
    pub fn update_details(
        &mut self,
        name: Option<String>,
        contact: Option<ContactInfo>,
    ) -> DomainResult<()> {
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("party name cannot be empty"));
            }
            self.name = name;
        }
        if let Some(contact) = contact {
            self.contact = contact;
        }
        Ok(())
    }

    pub fn suspend(&mut self) -> DomainResult<()> {
        if self.status == PartyStatus::Suspended {
            return Err(DomainError::conflict("party is already suspended"));
        }
        self.status = PartyStatus::Suspended;
        Ok(())
    }

    pub fn reactivate(&mut self) -> DomainResult<()> {
        if self.status == PartyStatus::Active {
            return Err(DomainError::conflict("party is already active"));
        }
        self.status = PartyStatus::Active;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supplier() -> Party {
        Party::register(
            PartyId::new(),
            PartyKind::Supplier,
            "Golden Grain Mills",
            ContactInfo {
                email: Some("orders@goldengrain.example".into()),
                ..ContactInfo::default()
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn register_rejects_blank_name() {
        let err = Party::register(
            PartyId::new(),
            PartyKind::DeliveryStaff,
            "   ",
            ContactInfo::default(),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn update_details_keeps_unset_fields() {
        let mut party = supplier();
        party
            .update_details(None, Some(ContactInfo { phone: Some("555-0101".into()), ..ContactInfo::default() }))
            .unwrap();

        assert_eq!(party.name(), "Golden Grain Mills");
        assert_eq!(party.contact().phone.as_deref(), Some("555-0101"));
        assert_eq!(party.contact().email, None);
    }

    #[test]
    fn suspend_and_reactivate_flip_status() {
        let mut party = supplier();
        assert!(party.is_active());

        party.suspend().unwrap();
        assert_eq!(party.status(), PartyStatus::Suspended);
        assert!(party.suspend().is_err());

        party.reactivate().unwrap();
        assert!(party.is_active());
        assert!(party.reactivate().is_err());
    }

    #[test]
    fn kind_round_trips_through_strings() {
        for kind in [PartyKind::Supplier, PartyKind::DeliveryStaff] {
            assert_eq!(PartyKind::parse(kind.as_str()).unwrap(), kind);
        }
        assert!(PartyKind::parse("customer").is_err());
    }
}
