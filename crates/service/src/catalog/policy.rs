use serde::Deserialize;
use serde_json::Value;

use crate::storage::json_collection::Record;

/// What the store does when the file cannot be read or written.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log and absorb: a failed load reads as an empty catalog, a failed
    /// persist leaves the change in memory only.
    #[default]
    Soft,
    /// Return the storage error to the caller.
    Strict,
}

/// How `create` picks the id of a new record.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdPolicy {
    /// `count + 1`. After a delete this can reuse an id that is still taken.
    #[default]
    Positional,
    /// `max(existing integer ids) + 1`, or 1 for an empty catalog.
    NextAfterMax,
}

impl IdPolicy {
    pub fn next_id(self, collection: &[Record]) -> i64 {
        match self {
            Self::Positional => {
                i64::try_from(collection.len()).unwrap_or(i64::MAX).saturating_add(1)
            }
            Self::NextAfterMax => collection
                .iter()
                .filter_map(|r| r.get("id").and_then(Value::as_i64))
                .max()
                .unwrap_or(0)
                .saturating_add(1),
        }
    }
}

/// Whether read-modify-write cycles exclude each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteSerialization {
    /// Concurrent cycles may interleave and overwrite each other's writes.
    #[default]
    None,
    /// One cycle at a time, guarded by a single async mutex.
    Serialized,
}

impl From<bool> for WriteSerialization {
    fn from(serialize: bool) -> Self {
        if serialize { Self::Serialized } else { Self::None }
    }
}

/// Numeric equality, so `1`, `1.0` and `1e0` all match id 1.
pub fn id_matches(record: &Record, id: i64) -> bool {
    match record.get("id") {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(v) => v == id,
            None => n.as_f64() == Some(id as f64),
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(v: Value) -> Vec<Record> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn positional_ids_follow_count() {
        assert_eq!(IdPolicy::Positional.next_id(&[]), 1);
        let c = records(json!([{"id": 1}, {"id": 7}]));
        assert_eq!(IdPolicy::Positional.next_id(&c), 3);
    }

    #[test]
    fn next_after_max_skips_taken_ids() {
        assert_eq!(IdPolicy::NextAfterMax.next_id(&[]), 1);
        let c = records(json!([{"id": 2}, {"id": 7}, {"name": "no id"}, {"id": "9"}]));
        assert_eq!(IdPolicy::NextAfterMax.next_id(&c), 8);
    }

    #[test]
    fn id_matching_is_numeric() {
        let c = records(json!([{"id": 1}, {"id": 2.0}, {"id": "3"}, {}]));
        assert!(id_matches(&c[0], 1));
        assert!(id_matches(&c[1], 2));
        assert!(!id_matches(&c[2], 3));
        assert!(!id_matches(&c[3], 1));
        assert!(!id_matches(&c[0], 2));
    }

    #[test]
    fn policies_deserialize_from_snake_case() {
        let p: IdPolicy = serde_json::from_value(json!("next_after_max")).unwrap();
        assert_eq!(p, IdPolicy::NextAfterMax);
        let f: FailurePolicy = serde_json::from_value(json!("strict")).unwrap();
        assert_eq!(f, FailurePolicy::Strict);
        assert_eq!(WriteSerialization::from(true), WriteSerialization::Serialized);
    }
}
