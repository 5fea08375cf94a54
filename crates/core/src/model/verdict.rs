use std::fmt;

/// Outcome of a finished case, as written to the contract's `result` field.
///
/// Every finished run solved the case; the tier reflects how many wrong
/// picks it took to get there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// No wrong picks.
    Flawless,
    /// At most one wrong pick per question on average.
    Solved,
    Struggled,
}

impl Verdict {
    /// Tier a run by total misses over `question_count` questions.
    #[must_use]
    pub fn from_misses(misses: u32, question_count: usize) -> Self {
        let allowance = u32::try_from(question_count).unwrap_or(u32::MAX);
        if misses == 0 {
            Self::Flawless
        } else if misses <= allowance {
            Self::Solved
        } else {
            Self::Struggled
        }
    }

    /// Code stored on-chain.
    #[must_use]
    pub fn result_code(self) -> u8 {
        match self {
            Self::Flawless => 1,
            Self::Solved => 2,
            Self::Struggled => 3,
        }
    }

    #[must_use]
    pub fn from_result_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Flawless),
            2 => Some(Self::Solved),
            3 => Some(Self::Struggled),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Flawless => "Perfect Investigation",
            Self::Solved => "Case Closed",
            Self::Struggled => "Case Closed (with help)",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_by_misses() {
        assert_eq!(Verdict::from_misses(0, 10), Verdict::Flawless);
        assert_eq!(Verdict::from_misses(1, 10), Verdict::Solved);
        assert_eq!(Verdict::from_misses(10, 10), Verdict::Solved);
        assert_eq!(Verdict::from_misses(11, 10), Verdict::Struggled);
    }

    #[test]
    fn result_codes_roundtrip() {
        for verdict in [Verdict::Flawless, Verdict::Solved, Verdict::Struggled] {
            assert_eq!(Verdict::from_result_code(verdict.result_code()), Some(verdict));
        }
        assert_eq!(Verdict::from_result_code(0), None);
    }
}
