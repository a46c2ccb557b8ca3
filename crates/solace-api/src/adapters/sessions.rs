use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use solace_core::models::session::SessionState;
use solace_core::storage_keys;
use solace_screening::error::StoreError;
use solace_screening::store::SessionStore;
use solace_storage::error::StorageError;
use solace_storage::objects::Bucket;
use uuid::Uuid;

/// Session records persisted as JSON objects under `sessions/`.
///
/// Survives restarts and is shared by every instance behind the same
/// bucket. Expired records are deleted when next read or by a purge, which
/// also clears out records that no longer decode.
pub struct S3SessionStore {
    bucket: Bucket,
    ttl: SignedDuration,
}

impl S3SessionStore {
    pub fn new(bucket: Bucket, ttl: SignedDuration) -> Self {
        Self { bucket, ttl }
    }
}

fn store_error(e: impl std::fmt::Display) -> StoreError {
    StoreError(e.to_string())
}

#[async_trait]
impl SessionStore for S3SessionStore {
    async fn load(&self, id: Uuid) -> Result<Option<SessionState>, StoreError> {
        let key = storage_keys::session(id);
        let Some(state) = self
            .bucket
            .load_json::<SessionState>(&key)
            .await
            .map_err(store_error)?
        else {
            return Ok(None);
        };

        if state.is_expired(self.ttl, Timestamp::now()) {
            tracing::info!(session_id = %id, "session expired");
            self.bucket.delete(&key).await.map_err(store_error)?;
            return Ok(None);
        }
        Ok(Some(state))
    }

    async fn save(&self, state: &SessionState) -> Result<(), StoreError> {
        self.bucket
            .save_json(&storage_keys::session(state.session_id), state)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        self.bucket
            .delete(&storage_keys::session(id))
            .await
            .map_err(store_error)
    }

    async fn purge_expired(&self) -> Result<usize, StoreError> {
        let now = Timestamp::now();
        let keys = self
            .bucket
            .list(storage_keys::SESSIONS_PREFIX)
            .await
            .map_err(store_error)?;

        let mut purged = 0;
        for key in keys {
            let record = self.bucket.load_json::<SessionState>(&key).await;
            match purge_action(record, self.ttl, now) {
                PurgeAction::Keep => continue,
                PurgeAction::Skip(reason) => {
                    tracing::warn!(key = %key, error = %reason, "could not read session record");
                    continue;
                }
                PurgeAction::Delete(reason) => {
                    if let Err(e) = self.bucket.delete(&key).await {
                        tracing::warn!(key = %key, error = %e, "could not delete session record");
                        continue;
                    }
                    tracing::debug!(key = %key, reason, "session record purged");
                    purged += 1;
                }
            }
        }
        Ok(purged)
    }
}

/// What a purge does with one listed record.
#[derive(Debug, PartialEq, Eq)]
enum PurgeAction {
    Keep,
    Delete(&'static str),
    /// Read failed for a reason that may clear up; try again next sweep.
    Skip(String),
}

fn purge_action(
    record: Result<Option<SessionState>, StorageError>,
    ttl: SignedDuration,
    now: Timestamp,
) -> PurgeAction {
    match record {
        Ok(Some(state)) if state.is_expired(ttl, now) => PurgeAction::Delete("expired"),
        Ok(_) => PurgeAction::Keep,
        // Undecodable records can never be loaded again.
        Err(StorageError::Serialization(_)) => PurgeAction::Delete("unreadable"),
        Err(e) => PurgeAction::Skip(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use solace_core::models::language::Language;

    use super::*;

    const TTL: SignedDuration = SignedDuration::from_hours(24);

    fn record_touched_at(updated: Timestamp) -> Result<Option<SessionState>, StorageError> {
        Ok(Some(SessionState::new(
            Uuid::new_v4(),
            "user-1",
            Language::English,
            updated,
        )))
    }

    #[test]
    fn stale_record_is_deleted_and_fresh_one_kept() {
        let now = Timestamp::now();
        let stale = now - SignedDuration::from_hours(25);
        let fresh = now - SignedDuration::from_hours(1);

        assert_eq!(
            purge_action(record_touched_at(stale), TTL, now),
            PurgeAction::Delete("expired")
        );
        assert_eq!(purge_action(record_touched_at(fresh), TTL, now), PurgeAction::Keep);
    }

    #[test]
    fn vanished_record_is_left_alone() {
        assert_eq!(purge_action(Ok(None), TTL, Timestamp::now()), PurgeAction::Keep);
    }

    #[test]
    fn undecodable_record_is_deleted() {
        let err = serde_json::from_slice::<SessionState>(b"{\"session_id\":").unwrap_err();
        assert_eq!(
            purge_action(Err(StorageError::Serialization(err)), TTL, Timestamp::now()),
            PurgeAction::Delete("unreadable")
        );
    }

    #[test]
    fn failed_read_is_skipped_not_fatal() {
        let action = purge_action(
            Err(StorageError::GetObject("connection reset".into())),
            TTL,
            Timestamp::now(),
        );
        assert!(matches!(action, PurgeAction::Skip(reason) if reason.contains("connection reset")));
    }
}
