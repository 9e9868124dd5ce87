use tracing::{debug, info, warn};

use super::{
    domain::{NewUser, User},
    error::{AuthError, StoreError},
    password::{hash_password, verify_against_dummy, verify_password},
    repo::UserRepository,
};

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    /// Hash the submitted password and create the user.
    pub async fn signup(&self, mut user: NewUser) -> Result<User, AuthError> {
        user.password = hash_password(&user.password)?;
        let created = self.repo.create(user).await?;
        info!(user_id = created.id, "user signed up");
        Ok(created)
    }

    /// Look up `email` and check `password` against the stored hash.
    /// An unknown email still pays for one Argon2 verify.
    pub async fn signin(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = match self.repo.find_by_email(email).await {
            Ok(u) => u,
            Err(StoreError::NotFound) => {
                verify_against_dummy(password);
                debug!("signin for unknown email");
                return Err(AuthError::UserNotFound);
            }
            Err(e) => return Err(e.into()),
        };
        if !verify_password(password, &user.password)? {
            warn!(user_id = user.id, "password mismatch");
            return Err(AuthError::InvalidCredential);
        }
        debug!(user_id = user.id, "credentials verified");
        Ok(user)
    }

    /// Writes `user` as given; the caller owns hashing of `user.password`.
    pub async fn update(&self, user: &User) -> Result<(), AuthError> {
        self.repo.update(user).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<User, AuthError> {
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<User, AuthError> {
        Ok(self.repo.find_by_email(email).await?)
    }

    /// Replace email and password of an existing user. The new password is
    /// hashed the same way signup hashes it.
    pub async fn edit_profile(
        &self,
        id: i64,
        email: String,
        password: &str,
    ) -> Result<User, AuthError> {
        let existing = self.find_by_id(id).await?;
        let updated = User {
            email,
            password: hash_password(password)?,
            ..existing
        };
        self.update(&updated).await?;
        info!(user_id = updated.id, "profile updated");
        // updated_at is server-assigned; reload so the caller sees the stored row.
        self.find_by_id(id).await
    }
}
