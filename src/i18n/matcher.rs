//! Prefix matching for language tags.
//!
//! Tags are treated as opaque strings. Two tags are compatible when one is a
//! prefix of the other, so `"en"` matches `"en-US"` and vice versa. There is
//! no knowledge of subtags or case folding here.

/// A candidate selected by [`best_prefix_match`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixMatch<'a> {
    /// Position of the candidate in the input slice
    pub index: usize,

    /// The candidate string itself
    pub value: &'a str,
}

/// Find the best candidate that is prefix-compatible with `target`.
///
/// Candidates are scored differently depending on which way the prefix runs:
/// - a candidate that starts with `target` scores its own length
/// - a candidate that `target` starts with scores the length of `target`
///
/// A match replaces the current best only when its score is strictly greater
/// than the current best's length, so among equal scores the earliest wins and
/// a later prefix of `target` replaces any best shorter than `target`. The
/// first match is always kept, even when both strings are empty.
///
/// # Returns
/// * `Some(PrefixMatch)` with the winning candidate and its index
/// * `None` if no candidate is prefix-compatible with `target`
///
/// # Example
/// ```
/// use i18n_twee_list::i18n::best_prefix_match;
///
/// let found = best_prefix_match("en-US", &["zh", "en"]).unwrap();
/// assert_eq!((found.index, found.value), (1, "en"));
/// ```
pub fn best_prefix_match<'a, S>(target: &str, candidates: &'a [S]) -> Option<PrefixMatch<'a>>
where
    S: AsRef<str>,
{
    let mut best: Option<PrefixMatch<'a>> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let candidate = candidate.as_ref();
        let score = if candidate.starts_with(target) {
            candidate.len()
        } else if target.starts_with(candidate) {
            target.len()
        } else {
            continue;
        };

        let better = match best {
            Some(current) => score > current.value.len(),
            None => true,
        };
        if better {
            best = Some(PrefixMatch {
                index,
                value: candidate,
            });
        }
    }

    best
}
