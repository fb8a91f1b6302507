//! In-memory implementation of VerificationTokenRepository
//!
//! Backs tests and single-process deployments. All mutations happen under one
//! write lock, which makes supersession and consumption atomic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::verification_token::{TokenPurpose, VerificationToken};
use crate::errors::DomainError;

use super::r#trait::VerificationTokenRepository;

/// In-memory token store keyed by token id
#[derive(Clone)]
pub struct InMemoryVerificationTokenRepository {
    tokens: Arc<RwLock<HashMap<Uuid, VerificationToken>>>,
}

impl InMemoryVerificationTokenRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Snapshot of a stored token, for assertions
    pub async fn get(&self, id: Uuid) -> Option<VerificationToken> {
        self.tokens.read().await.get(&id).cloned()
    }

    /// Total number of stored tokens, consumed ones included
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

impl Default for InMemoryVerificationTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VerificationTokenRepository for InMemoryVerificationTokenRepository {
    async fn store_superseding(&self, token: VerificationToken) -> Result<u64, DomainError> {
        let mut tokens = self.tokens.write().await;

        if tokens
            .values()
            .any(|t| t.secret_hash == token.secret_hash || t.id == token.id)
        {
            return Err(DomainError::Validation {
                message: "Token already exists".to_string(),
            });
        }

        let mut superseded = 0;
        for existing in tokens.values_mut() {
            if existing.subject_id == token.subject_id
                && existing.purpose == token.purpose
                && existing.consume(token.issued_at)
            {
                superseded += 1;
            }
        }

        tokens.insert(token.id, token);
        Ok(superseded)
    }

    async fn find_by_secret_hash(
        &self,
        subject_id: &str,
        purpose: TokenPurpose,
        secret_hash: &str,
    ) -> Result<Option<VerificationToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .find(|t| t.matches(subject_id, purpose, secret_hash))
            .cloned())
    }

    async fn consume(&self, id: Uuid, consumed_at: DateTime<Utc>) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;
        Ok(tokens
            .get_mut(&id)
            .map(|token| token.consume(consumed_at))
            .unwrap_or(false))
    }

    async fn find_live(
        &self,
        subject_id: &str,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
    ) -> Result<Vec<VerificationToken>, DomainError> {
        let tokens = self.tokens.read().await;
        let mut live: Vec<VerificationToken> = tokens
            .values()
            .filter(|t| t.subject_id == subject_id && t.purpose == purpose && t.is_valid_at(now))
            .cloned()
            .collect();
        live.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(live)
    }

    async fn delete_expired(&self, before: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut tokens = self.tokens.write().await;
        let initial_count = tokens.len();

        tokens.retain(|_, token| token.expires_at >= before);

        Ok((initial_count - tokens.len()) as u64)
    }
}
