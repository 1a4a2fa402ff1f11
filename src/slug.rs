/// Derive a URL-safe slug from a column name: lowercase alphanumerics, with
/// every run of other characters collapsed into a single `-`.
///
/// Lowercasing can grow a string (`İ` becomes `i̇`), so the result is cut to
/// `max_chars` characters, dropping any trailing `-` the cut leaves behind.
pub fn slugify(name: &str, max_chars: usize) -> String {
    let slug = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    match slug.char_indices().nth(max_chars) {
        Some((cut, _)) => slug[..cut].trim_end_matches('-').to_string(),
        None => slug,
    }
}
