use stockroom_core::{DomainError, DomainResult, UserId};

use crate::password;

/// A user on record. The password hash is deliberately not part of this
/// type; only the stores and the login path ever touch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    login: String,
    is_admin: bool,
}

impl User {
    /// Rehydrate a user from stored fields.
    pub fn from_record(id: UserId, login: String, is_admin: bool) -> Self {
        Self {
            id,
            login,
            is_admin,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

fn validate_login(raw: impl Into<String>) -> DomainResult<String> {
    let login = raw.into().trim().to_string();
    let len = login.chars().count();
    if len < 3 {
        return Err(DomainError::validation(
            "login must be at least 3 characters",
        ));
    }
    if len > 50 {
        return Err(DomainError::validation(
            "login must be at most 50 characters",
        ));
    }
    Ok(login)
}

/// Validated input for creating a user. Carries the plaintext password
/// only until the store hashes it at insert time.
#[derive(Debug, Clone)]
pub struct NewUser {
    login: String,
    password: String,
    is_admin: bool,
}

impl NewUser {
    pub fn new(
        login: impl Into<String>,
        password: impl Into<String>,
        is_admin: bool,
    ) -> DomainResult<Self> {
        let login = validate_login(login)?;
        let password = password.into();
        password::validate(&password)?;
        Ok(Self {
            login,
            password,
            is_admin,
        })
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

/// Partial update for a user. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    login: Option<String>,
    password: Option<String>,
    is_admin: Option<bool>,
}

impl UserUpdate {
    pub fn new(
        login: Option<String>,
        password: Option<String>,
        is_admin: Option<bool>,
    ) -> DomainResult<Self> {
        let login = match login {
            Some(raw) => Some(validate_login(raw)?),
            None => None,
        };
        if let Some(password) = &password {
            password::validate(password)?;
        }
        Ok(Self {
            login,
            password,
            is_admin,
        })
    }

    pub fn login(&self) -> Option<&str> {
        self.login.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn is_admin(&self) -> Option<bool> {
        self.is_admin
    }
}
