//! URL slugs derived from product names.

/// Turn a human-readable name into a lowercase, hyphenated ASCII slug.
///
/// Non-ASCII text is transliterated (`"Crème"` -> `"creme"`), `@` is spelled out
/// as `at`, and every run of characters that are not ASCII letters or digits
/// collapses into one hyphen. The result never starts or ends with a hyphen, so
/// applying `slugify` to its own output returns it unchanged.
pub fn slugify(input: &str) -> String {
    ::slug::slugify(input.replace('@', " at "))
}
