use stockroom_auth::User;
use stockroom_core::UserId;

/// Authenticated identity for a request.
///
/// Inserted by the auth middleware; handlers read it to attribute ledger
/// entries to the caller and to gate admin-only operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    id: UserId,
    login: String,
    is_admin: bool,
}

impl CurrentUser {
    pub fn new(id: UserId, login: String, is_admin: bool) -> Self {
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

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id(),
            login: user.login().to_string(),
            is_admin: user.is_admin(),
        }
    }
}
