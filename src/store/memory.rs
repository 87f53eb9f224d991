//! In-process store
//!
//! Backs the integration tests and database-less local runs. Clones share
//! the same maps.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use super::{Chirp, ChirpStore, NewRefreshToken, RefreshTokenStore, User, UserStore};
use crate::auth::RefreshTokenRecord;
use crate::error::{AppError, DatabaseError};

#[derive(Default, Clone)]
pub struct InMemoryStore {
    users: Arc<DashMap<Uuid, User>>,
    by_email: Arc<DashMap<String, Uuid>>,
    chirps: Arc<DashMap<Uuid, Chirp>>,
    refresh_tokens: Arc<DashMap<String, RefreshTokenRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn duplicate_email() -> AppError {
    AppError::Database(DatabaseError::UniqueConstraintViolation(
        "Email already registered".to_string(),
    ))
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        // Copy the id out so no index guard is held while reading users
        let id = self.by_email.get(email).map(|r| *r.value());
        Ok(id.and_then(|id| self.users.get(&id).map(|r| r.value().clone())))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.get(&id).map(|r| r.value().clone()))
    }

    async fn create(&self, email: &str, hashed_password: &str) -> Result<User, AppError> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            is_chirpy_red: false,
        };

        match self.by_email.entry(email.to_string()) {
            Entry::Occupied(_) => return Err(duplicate_email()),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }
        self.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, AppError> {
        // The user guard is held across the index swap; `delete_all` clears
        // users before the index, so it cannot strand an index entry.
        let mut user = self
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::Database(DatabaseError::NotFound("User not found".to_string())))?;

        if user.email != email {
            match self.by_email.entry(email.to_string()) {
                Entry::Occupied(_) => return Err(duplicate_email()),
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
            self.by_email.remove(&user.email);
        }

        user.email = email.to_string();
        user.hashed_password = hashed_password.to_string();
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn upgrade(&self, id: Uuid) -> Result<bool, AppError> {
        match self.users.get_mut(&id) {
            Some(mut user) => {
                user.is_chirpy_red = true;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let removed = self.users.len() as u64;
        self.users.clear();
        self.by_email.clear();
        self.chirps.clear();
        self.refresh_tokens.clear();
        Ok(removed)
    }
}

#[async_trait]
impl ChirpStore for InMemoryStore {
    async fn create(&self, user_id: Uuid, body: &str) -> Result<Chirp, AppError> {
        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        self.chirps.insert(chirp.id, chirp.clone());
        Ok(chirp)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Chirp>, AppError> {
        Ok(self.chirps.get(&id).map(|r| r.value().clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.chirps.remove(&id).is_some())
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryStore {
    async fn insert(&self, token: NewRefreshToken) -> Result<(), AppError> {
        self.refresh_tokens.insert(
            token.token_hash,
            RefreshTokenRecord {
                user_id: token.user_id,
                issued_at: token.issued_at,
                expires_at: token.expires_at,
                revoked_at: None,
            },
        );
        Ok(())
    }

    async fn find(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError> {
        Ok(self.refresh_tokens.get(token_hash).map(|r| r.value().clone()))
    }

    async fn revoke(&self, token_hash: &str, revoked_at: DateTime<Utc>) -> Result<bool, AppError> {
        match self.refresh_tokens.get_mut(token_hash) {
            Some(mut record) => {
                record.revoked_at.get_or_insert(revoked_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
