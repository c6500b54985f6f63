//! Interpretation of the answer to "Are you sure you want to exit? [Y/n]".

/// Returns `true` when `answer` confirms termination.
///
/// The trailing line ending is ignored.  An empty answer takes the default
/// (`Y`); otherwise only the first character counts, case-insensitively.
pub fn is_exit_confirmed(answer: &str) -> bool {
    let answer = answer.trim_end_matches(['\r', '\n']);
    match answer.chars().next() {
        None => true,
        Some(first) => first.eq_ignore_ascii_case(&'y'),
    }
}
