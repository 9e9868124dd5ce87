use time::OffsetDateTime;

/// A registered user. `password` always holds a hash, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Signup input before the password is hashed and the row exists.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
}
