use serde::{Serialize, de::DeserializeOwned};

use crate::error::StorageError;
use crate::objects::Bucket;

impl Bucket {
    /// Load a JSON record. A missing key yields `None`.
    pub async fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.get(key).await {
            Ok(object) => Ok(Some(decode(&object.body)?)),
            Err(StorageError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Save a JSON record. Returns the new ETag.
    pub async fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<String, StorageError> {
        let body = encode(value)?;
        self.put(key, body, Some("application/json")).await
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StorageError> {
    Ok(serde_json::to_vec_pretty(value)?)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, StorageError> {
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use solace_core::models::language::Language;
    use solace_core::models::session::SessionState;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn session_records_survive_encoding() {
        let now = Timestamp::from_second(1_700_000_000).unwrap();
        let mut state = SessionState::new(Uuid::new_v4(), "u-3", Language::English, now);
        state.push_user("fine", now);
        state.record_score(1, now);

        let body = encode(&state).unwrap();
        let restored: SessionState = decode(&body).unwrap();
        assert_eq!(restored.session_id, state.session_id);
        assert_eq!(restored.scores, vec![1]);
        assert_eq!(restored.history, state.history);
    }

    #[test]
    fn garbage_is_a_serialization_error() {
        let err = decode::<SessionState>(b"not json").unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
