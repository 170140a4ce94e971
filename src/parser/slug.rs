/// Derives the catalog id for a display name.
///
/// Lowercases the name, turns every character outside `[a-z0-9]` into `-`,
/// collapses runs of `-` and strips them from both ends. Distinct names may
/// produce the same slug.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    slug
}
