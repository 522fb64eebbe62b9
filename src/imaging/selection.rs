/// Pick the thumbnail source for a group.
///
/// Walks `extensions` in priority order and returns the first
/// `prefix.ext` present in `files`. Extension matching is exact, so
/// `fig1.PNG` is not a candidate for `png`.
pub fn select_thumbnail_source<S: AsRef<str>>(
    prefix: &str,
    files: &[String],
    extensions: &[S],
) -> Option<String> {
    extensions
        .iter()
        .map(|ext| format!("{}.{}", prefix, ext.as_ref()))
        .find(|candidate| files.contains(candidate))
}
