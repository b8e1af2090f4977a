use crate::constants::TOLERATED_LEADING_DRIFT;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of comparing harness token ids against the adapter's re-encoding.
pub enum AlignmentVerdict {
    /// Sequences are identical.
    Match,
    /// Sequences differ only in the leading two positions.
    MinorDrift {
        /// Harness-supplied ids.
        expected: Vec<u32>,
        /// Re-encoded ids, truncated to the harness length.
        actual: Vec<u32>,
    },
    /// Sequences differ past the tolerated prefix.
    Mismatch {
        /// Harness-supplied ids.
        expected: Vec<u32>,
        /// Re-encoded ids, truncated to the harness length.
        actual: Vec<u32>,
    },
}

impl AlignmentVerdict {
    /// Compares `expected` against an already truncated `actual`.
    pub fn classify(expected: &[u32], actual: &[u32]) -> Self {
        if expected == actual {
            return AlignmentVerdict::Match;
        }

        let tail = |ids: &[u32]| -> Vec<u32> {
            ids.get(TOLERATED_LEADING_DRIFT..)
                .map(<[u32]>::to_vec)
                .unwrap_or_default()
        };

        if tail(expected) == tail(actual) {
            AlignmentVerdict::MinorDrift {
                expected: expected.to_vec(),
                actual: actual.to_vec(),
            }
        } else {
            AlignmentVerdict::Mismatch {
                expected: expected.to_vec(),
                actual: actual.to_vec(),
            }
        }
    }

    /// Returns `true` unless the verdict is [`AlignmentVerdict::Mismatch`].
    pub fn is_acceptable(&self) -> bool {
        !matches!(self, AlignmentVerdict::Mismatch { .. })
    }

    pub fn is_drift(&self) -> bool {
        matches!(self, AlignmentVerdict::MinorDrift { .. })
    }

    /// Returns a short debug string.
    pub fn debug_status(&self) -> &'static str {
        match self {
            AlignmentVerdict::Match => "MATCH",
            AlignmentVerdict::MinorDrift { .. } => "MINOR_DRIFT",
            AlignmentVerdict::Mismatch { .. } => "MISMATCH",
        }
    }
}

impl std::fmt::Display for AlignmentVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlignmentVerdict::Match => write!(f, "MATCH"),
            AlignmentVerdict::MinorDrift { expected, actual }
            | AlignmentVerdict::Mismatch { expected, actual } => write!(
                f,
                "{} (expected: {:?}, actual: {:?})",
                self.debug_status(),
                expected,
                actual
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Canonical text for one item plus the verdict that admitted it.
pub struct Reconciled {
    /// Text to submit for scoring.
    pub text: String,
    /// Always `Match` or `MinorDrift`.
    pub verdict: AlignmentVerdict,
}
