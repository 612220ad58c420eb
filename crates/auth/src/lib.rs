//! `stockroom-auth` — user identity domain.
//!
//! User records, validated user input, and password hashing. Authorization
//! itself (the admin capability check) lives in the HTTP layer; this crate
//! only says who a user is and whether a presented password matches.

pub mod password;
pub mod user;

pub use password::{HashedPassword, PasswordError};
pub use user::{NewUser, User, UserUpdate};
