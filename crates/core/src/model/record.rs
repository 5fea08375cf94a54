use alloy_primitives::hex;
use chrono::{DateTime, Utc};

use crate::model::verdict::Verdict;

/// A player's on-chain entry for one case.
///
/// Owned by the contract; this type only mirrors what a read returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseRecord {
    /// Raw 256-bit seed word chosen by the contract on `startCase`.
    pub seed: [u8; 32],
    pub result: u8,
    /// Unix seconds.
    pub timestamp: u64,
    pub completed: bool,
}

impl CaseRecord {
    /// Whether `startCase` has ever been called for this key.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.timestamp != 0 || self.seed.iter().any(|b| *b != 0)
    }

    #[must_use]
    pub fn verdict(&self) -> Option<Verdict> {
        if self.completed {
            Verdict::from_result_code(self.result)
        } else {
            None
        }
    }

    #[must_use]
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        if self.timestamp == 0 {
            return None;
        }
        let secs = i64::try_from(self.timestamp).ok()?;
        DateTime::<Utc>::from_timestamp(secs, 0)
    }

    #[must_use]
    pub fn seed_hex(&self) -> String {
        hex::encode_prefixed(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FIXED_TEST_TIMESTAMP;

    #[test]
    fn empty_record_is_not_started() {
        let record = CaseRecord {
            seed: [0; 32],
            result: 0,
            timestamp: 0,
            completed: false,
        };
        assert!(!record.is_started());
        assert_eq!(record.verdict(), None);
        assert_eq!(record.recorded_at(), None);
    }

    #[test]
    fn completed_record_maps_verdict() {
        let mut seed = [0; 32];
        seed[31] = 7;
        let record = CaseRecord {
            seed,
            result: 1,
            timestamp: u64::try_from(FIXED_TEST_TIMESTAMP).unwrap(),
            completed: true,
        };
        assert!(record.is_started());
        assert_eq!(record.verdict(), Some(Verdict::Flawless));
        assert_eq!(record.recorded_at().unwrap().timestamp(), FIXED_TEST_TIMESTAMP);
        assert!(record.seed_hex().ends_with("07"));
    }
}
