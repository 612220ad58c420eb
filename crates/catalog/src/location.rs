use stockroom_core::{DomainError, DomainResult, LocationId};

/// A storage location. Identity is the (zone_name, shelf_number) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    id: LocationId,
    zone_name: String,
    shelf_number: i32,
}

impl Location {
    /// Rehydrate a location from stored fields.
    pub fn from_record(id: LocationId, zone_name: String, shelf_number: i32) -> Self {
        Self {
            id,
            zone_name,
            shelf_number,
        }
    }

    pub fn id(&self) -> LocationId {
        self.id
    }

    pub fn zone_name(&self) -> &str {
        &self.zone_name
    }

    pub fn shelf_number(&self) -> i32 {
        self.shelf_number
    }
}

/// Validated input for creating a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLocation {
    zone_name: String,
    shelf_number: i32,
}

impl NewLocation {
    pub fn new(zone_name: impl Into<String>, shelf_number: i32) -> DomainResult<Self> {
        let zone_name = zone_name.into().trim().to_string();
        let len = zone_name.chars().count();
        if len == 0 {
            return Err(DomainError::validation("zone name cannot be empty"));
        }
        if len > 10 {
            return Err(DomainError::validation(
                "zone name must be at most 10 characters",
            ));
        }
        if shelf_number < 1 {
            return Err(DomainError::validation("shelf number must be at least 1"));
        }
        Ok(Self {
            zone_name,
            shelf_number,
        })
    }

    pub fn zone_name(&self) -> &str {
        &self.zone_name
    }

    pub fn shelf_number(&self) -> i32 {
        self.shelf_number
    }
}
