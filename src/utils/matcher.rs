/// Tests whether `needle` occurs in `haystack` at a word boundary.
///
/// Matching is ASCII case-insensitive. An occurrence is accepted only if the
/// character immediately before it and the one immediately after it are not
/// alphanumeric (or the occurrence touches the start/end of `haystack`).
/// The boundary is only enforced at an edge whose own character is
/// alphanumeric, so a flag emoji glued to text still matches while `UK`
/// never matches inside `Ukraine`.
///
/// # Examples
/// ```
/// use subcategorize::utils::matcher::contains_bounded;
///
/// assert!(contains_bounded("DE-Frankfurt-01", "de"));
/// assert!(!contains_bounded("Ukraine-Node-3", "UK"));
/// ```
pub fn contains_bounded(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }

    // ASCII lowering keeps byte offsets identical between the lowered and
    // the original strings.
    let hay = haystack.to_ascii_lowercase();
    let pat = needle.to_ascii_lowercase();

    let check_start = pat.chars().next().is_some_and(char::is_alphanumeric);
    let check_end = pat.chars().next_back().is_some_and(char::is_alphanumeric);

    let mut from = 0;
    while let Some(offset) = hay[from..].find(&pat) {
        let start = from + offset;
        let end = start + pat.len();

        let before_ok = !check_start
            || hay[..start]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = !check_end
            || hay[end..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric());

        if before_ok && after_ok {
            return true;
        }

        // Advance past the first character of this occurrence
        from = start
            + hay[start..]
                .chars()
                .next()
                .map_or(1, |c| c.len_utf8());
    }

    false
}
