//! Session store — the persistence collaborator.
//!
//! The engine never talks to storage. The conversation service loads a
//! session/profile pair, processes a turn, and saves both halves together.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Profile, Session};

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    NotFound(Uuid),

    #[error("Profile not found: {0}")]
    ProfileNotFound(Uuid),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<(Session, Profile), StoreError>;

    /// Saves both halves in one write. A failed save leaves the previous
    /// pair in place.
    async fn save(&self, session: &Session, profile: &Profile) -> Result<(), StoreError>;
}

/// Process-local store for embedding and tests.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<Uuid, (Session, Profile)>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: Uuid) -> Result<(Session, Profile), StoreError> {
        self.entries
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn save(&self, session: &Session, profile: &Profile) -> Result<(), StoreError> {
        if profile.session_id != session.id {
            return Err(StoreError::Persistence(format!(
                "profile {} does not belong to session {}",
                profile.session_id, session.id
            )));
        }
        self.entries
            .write()
            .await
            .insert(session.id, (session.clone(), profile.clone()));
        Ok(())
    }
}
