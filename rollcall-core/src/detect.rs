//! Duplicate detection over the record table
//!
//! Two independent signals are evaluated on every submission: a fingerprint
//! scan over the stored origin addresses and client signatures of all rows,
//! and a prior-mark check on the matched subject. A fresh-looking submission
//! for a never-marked subject can still collide on fingerprint with another
//! subject's stored data, so neither signal is skipped.

use crate::table::RecordTable;

/// Classification of a submission against the current table state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No prior mark, no fingerprint collision
    Fresh,
    /// The matched subject already carries a marker
    DuplicateByMark,
    /// A stored origin address or client signature collides
    DuplicateByFingerprint {
        /// Identifier of the first colliding row in table order
        duplicate_with: String,
    },
}

impl Verdict {
    pub fn is_duplicate(&self) -> bool {
        !matches!(self, Verdict::Fresh)
    }

    /// Identifier of the colliding subject, when one was attributed
    pub fn duplicate_with(&self) -> Option<&str> {
        match self {
            Verdict::DuplicateByFingerprint { duplicate_with } => Some(duplicate_with),
            _ => None,
        }
    }
}

/// Classify a submission against the pre-mutation table state.
///
/// The fingerprint scan covers every row, including the matched row's own
/// stored values from an earlier attempt, and stops at the first collision
/// in table order. Empty stored fields never collide. The prior-mark check
/// runs regardless of the scan outcome; a fingerprint collision takes
/// precedence so the annotation can name the colliding subject.
pub fn classify(
    table: &RecordTable,
    row: usize,
    origin_address: &str,
    client_signature: &str,
) -> Verdict {
    let mut duplicate_with = None;
    for record in table.records() {
        let origin_hit =
            !record.origin_address.is_empty() && record.origin_address == origin_address;
        let signature_hit =
            !record.client_signature.is_empty() && record.client_signature == client_signature;
        if origin_hit || signature_hit {
            duplicate_with = Some(record.identifier.clone());
            break;
        }
    }

    let prior_mark = !table.record(row).marker.is_empty();

    match duplicate_with {
        Some(identifier) => Verdict::DuplicateByFingerprint {
            duplicate_with: identifier,
        },
        None if prior_mark => Verdict::DuplicateByMark,
        None => Verdict::Fresh,
    }
}
