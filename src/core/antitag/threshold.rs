// Size-adaptive mass-mention threshold.

use super::antitag_models::Classification;

/// Messages with fewer distinct mentions never reach the roster fetch.
pub const PREFILTER_MIN_MENTIONS: usize = 3;

/// Canonical numeric mentions that trip detection regardless of group size.
pub const NUMERIC_TRIPWIRE: usize = 5;

/// Groups up to this size use the absolute floor.
const SMALL_GROUP_MAX: usize = 10;
/// Groups up to this size use the medium ratio.
const MEDIUM_GROUP_MAX: usize = 30;

/// Number of distinct mentions that counts as a mass mention in a group of `group_size`.
///
/// - up to 10 members: 3
/// - 11 to 30 members: 40% of the group, rounded up
/// - more than 30: 30% of the group, rounded up
pub fn mention_threshold(group_size: usize) -> usize {
    if group_size <= SMALL_GROUP_MAX {
        PREFILTER_MIN_MENTIONS
    } else if group_size <= MEDIUM_GROUP_MAX {
        // ceil(n * 0.4) in integer arithmetic
        (group_size * 2).div_ceil(5)
    } else {
        (group_size * 3).div_ceil(10)
    }
}

/// Whether a message passes the cheap pre-filter and needs a roster lookup.
pub fn needs_evaluation(unique_mentions: usize) -> bool {
    unique_mentions >= PREFILTER_MIN_MENTIONS
}

/// Classify a message given its mention counts and the live group size.
pub fn classify(unique_mentions: usize, numeric_count: usize, group_size: usize) -> Classification {
    let threshold = mention_threshold(group_size);
    Classification {
        is_attack: unique_mentions >= threshold || numeric_count >= NUMERIC_TRIPWIRE,
        threshold,
        group_size,
    }
}
