use std::collections::HashMap;

use crate::error::{ScalerError, ScalerResult};

pub const WAIT_LIST_KEY: &str = "waitList";
pub const ACTIVE_LIST_KEY: &str = "activeList";
pub const MAX_PODS_KEY: &str = "maxPods";

/// Names of the two Redis lists that together hold a workload's outstanding jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuePair {
    /// Jobs waiting to be picked up.
    pub pending: String,
    /// Jobs currently being processed.
    pub in_flight: String,
}

impl QueuePair {
    pub fn resolve(metadata: &HashMap<String, String>) -> ScalerResult<Self> {
        Ok(Self {
            pending: required(metadata, WAIT_LIST_KEY)?.to_string(),
            in_flight: required(metadata, ACTIVE_LIST_KEY)?.to_string(),
        })
    }
}

/// Call-scoped scaler settings, resolved from the caller's metadata at the
/// top of every metric query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalerMetadata {
    pub queues: QueuePair,
    pub ceiling: i64,
}

impl ScalerMetadata {
    pub fn resolve(metadata: &HashMap<String, String>) -> ScalerResult<Self> {
        let queues = QueuePair::resolve(metadata)?;
        let ceiling = parse_ceiling(required(metadata, MAX_PODS_KEY)?)?;
        Ok(Self { queues, ceiling })
    }
}

/// Look up a required key. Absent and empty values are both rejected.
pub fn required<'a>(metadata: &'a HashMap<String, String>, key: &str) -> ScalerResult<&'a str> {
    match metadata.get(key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ScalerError::MissingMetadata(key.to_string())),
    }
}

/// Parse the scale ceiling. Only strictly positive base-10 integers are valid.
pub fn parse_ceiling(value: &str) -> ScalerResult<i64> {
    match value.parse::<i64>() {
        Ok(ceiling) if ceiling > 0 => Ok(ceiling),
        _ => Err(ScalerError::InvalidCeiling(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full() -> HashMap<String, String> {
        metadata(&[
            ("waitList", "bull:render:wait"),
            ("activeList", "bull:render:active"),
            ("maxPods", "10"),
        ])
    }

    #[test]
    fn resolves_complete_metadata() {
        let resolved = ScalerMetadata::resolve(&full()).unwrap();
        assert_eq!(resolved.queues.pending, "bull:render:wait");
        assert_eq!(resolved.queues.in_flight, "bull:render:active");
        assert_eq!(resolved.ceiling, 10);
    }

    #[test]
    fn each_missing_key_is_reported_by_name() {
        for key in [WAIT_LIST_KEY, ACTIVE_LIST_KEY, MAX_PODS_KEY] {
            let mut md = full();
            md.remove(key);
            match ScalerMetadata::resolve(&md) {
                Err(ScalerError::MissingMetadata(missing)) => assert_eq!(missing, key),
                other => panic!("expected MissingMetadata({key}), got {other:?}"),
            }
        }
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let mut md = full();
        md.insert("activeList".to_string(), String::new());
        assert!(matches!(
            ScalerMetadata::resolve(&md),
            Err(ScalerError::MissingMetadata(key)) if key == "activeList"
        ));
    }

    #[test]
    fn queue_pair_ignores_ceiling() {
        let md = metadata(&[("waitList", "w"), ("activeList", "a"), ("maxPods", "abc")]);
        let pair = QueuePair::resolve(&md).unwrap();
        assert_eq!(pair.pending, "w");
        assert_eq!(pair.in_flight, "a");
    }

    #[test]
    fn rejects_non_positive_or_non_numeric_ceilings() {
        for value in ["0", "-5", "abc", "1.5", " 3", ""] {
            assert!(
                matches!(parse_ceiling(value), Err(ScalerError::InvalidCeiling(v)) if v == value),
                "expected {value:?} to be rejected"
            );
        }
    }

    #[test]
    fn accepts_positive_ceilings() {
        assert_eq!(parse_ceiling("1").unwrap(), 1);
        assert_eq!(parse_ceiling("1000000").unwrap(), 1_000_000);
    }

    #[test]
    fn invalid_ceiling_surfaces_through_resolve() {
        let mut md = full();
        md.insert("maxPods".to_string(), "0".to_string());
        assert!(matches!(
            ScalerMetadata::resolve(&md),
            Err(ScalerError::InvalidCeiling(v)) if v == "0"
        ));
    }
}
