use stockroom_core::{DomainError, DomainResult, SupplierId};

/// A supplier on record. Referenced (not owned) by products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Supplier {
    id: SupplierId,
    name: String,
    contact_email: Option<String>,
}

impl Supplier {
    /// Rehydrate a supplier from stored fields.
    pub fn from_record(id: SupplierId, name: String, contact_email: Option<String>) -> Self {
        Self {
            id,
            name,
            contact_email,
        }
    }

    pub fn id(&self) -> SupplierId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact_email(&self) -> Option<&str> {
        self.contact_email.as_deref()
    }
}

/// Validated input for creating a supplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSupplier {
    name: String,
    contact_email: Option<String>,
}

impl NewSupplier {
    pub fn new(name: impl Into<String>, contact_email: Option<String>) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        let len = name.chars().count();
        if len < 2 {
            return Err(DomainError::validation(
                "supplier name must be at least 2 characters",
            ));
        }
        if len > 100 {
            return Err(DomainError::validation(
                "supplier name must be at most 100 characters",
            ));
        }
        if let Some(email) = &contact_email {
            if !email.contains('@') {
                return Err(DomainError::validation("contact email must contain '@'"));
            }
        }
        Ok(Self {
            name,
            contact_email,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact_email(&self) -> Option<&str> {
        self.contact_email.as_deref()
    }
}
