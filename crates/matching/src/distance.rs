//! Edit distance between names.

/// Maximum number of single-character edits for two names to be considered the same.
///
/// Two edits absorb transpositions such as `Sapriacone` vs `Sapraicone`.
pub const NAME_EDIT_THRESHOLD: usize = 2;

/// Levenshtein distance between two strings, counted in Unicode scalar values.
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            let insertion = current[j] + 1;
            let deletion = previous[j + 1] + 1;
            current[j + 1] = substitution.min(insertion).min(deletion);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Whether two strings are within [`NAME_EDIT_THRESHOLD`] edits of each other.
pub fn within_threshold(a: &str, b: &str) -> bool {
    levenshtein(a, b) <= NAME_EDIT_THRESHOLD
}
