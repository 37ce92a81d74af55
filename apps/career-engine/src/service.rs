//! Conversation service — the calling layer around the engine.
//!
//! Serialises turns per session id, loads from the store, runs the engine,
//! saves both halves together, and only then offers the result to the
//! augmenter. A failed save commits nothing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::augment::{augment_with_timeout, prompts::build_augment_prompt, AugmentOutcome, Augmenter};
use crate::engine::{Engine, MessageContext};
use crate::errors::EngineError;
use crate::models::{Phase, Profile, Session};
use crate::store::SessionStore;
use crate::synthesis::Summary;

/// What a caller shows after a turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReply {
    pub session_id: Uuid,
    pub context: MessageContext,
    /// Augmented wording when available, else the rule-based question.
    pub message: String,
    pub augmentation: AugmentOutcome,
    /// Filled once the session reaches Review.
    pub summary: Option<Summary>,
}

pub struct ConversationService {
    engine: Engine,
    store: Arc<dyn SessionStore>,
    augmenter: Option<Arc<dyn Augmenter>>,
    augment_timeout: Duration,
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl ConversationService {
    pub fn new(
        engine: Engine,
        store: Arc<dyn SessionStore>,
        augmenter: Option<Arc<dyn Augmenter>>,
        augment_timeout: Duration,
    ) -> Self {
        Self {
            engine,
            store,
            augmenter,
            augment_timeout,
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn session_lock(&self, id: Uuid) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .await
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    pub async fn start_session(&self) -> Result<(Session, Profile), EngineError> {
        let (session, profile) = self.engine.start();
        self.store.save(&session, &profile).await?;
        Ok((session, profile))
    }

    /// Drops the map entry once nobody but the caller holds the lock. Clones
    /// are only taken under the map lock, so a waiter always keeps it alive.
    async fn release_lock(&self, id: Uuid, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().await;
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&id);
        }
    }

    pub async fn submit_turn(&self, id: Uuid, text: &str) -> Result<TurnReply, EngineError> {
        let lock = self.session_lock(id).await;
        let result = {
            let _guard = lock.lock().await;
            self.run_turn(id, text).await
        };
        self.release_lock(id, lock).await;
        result
    }

    async fn run_turn(&self, id: Uuid, text: &str) -> Result<TurnReply, EngineError> {
        let (session, profile) = self.store.load(id).await?;
        let outcome = self.engine.process_turn(&session, &profile, text)?;
        self.store.save(&outcome.session, &outcome.profile).await?;

        if outcome.message_context.decision.changed() {
            info!(
                session_id = %id,
                phase = %outcome.session.phase,
                progress = outcome.message_context.progress_percentage,
                "phase changed"
            );
        }

        let summary = (outcome.session.phase == Phase::Review)
            .then(|| self.engine.synthesize(&outcome.profile));

        let prompt = build_augment_prompt(text, &outcome.message_context);
        let augmentation =
            augment_with_timeout(self.augmenter.as_deref(), &prompt, self.augment_timeout).await;
        let message = augmentation
            .text()
            .map(str::to_string)
            .unwrap_or_else(|| outcome.message_context.next_question.clone());

        Ok(TurnReply {
            session_id: id,
            context: outcome.message_context,
            message,
            augmentation,
            summary,
        })
    }

    pub async fn summary(&self, id: Uuid) -> Result<Summary, EngineError> {
        let (_, profile) = self.store.load(id).await?;
        Ok(self.engine.synthesize(&profile))
    }

    pub async fn snapshot(&self, id: Uuid) -> Result<(Session, Profile), EngineError> {
        Ok(self.store.load(id).await?)
    }
}
