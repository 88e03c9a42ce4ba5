//! Identifier case conversion for include keys and generated type names.

/// `authorProfile`, `AuthorProfile`, `author profile` → `author_profile`.
///
/// An underscore is inserted before every uppercase letter that does not
/// start the word, unless one is already there: `Author_Profile` gives
/// `author_profile`. Names that are already snake_case come back unchanged.
pub fn snake(name: &str) -> String {
    let joined = capitalize_words(name.split_whitespace());
    let mut out = String::with_capacity(joined.len() + 4);
    for (i, ch) in joined.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 && !out.ends_with(['_', '-']) {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// `author_profile`, `author-profile`, `authorProfile` → `AuthorProfile`.
pub fn studly(name: &str) -> String {
    capitalize_words(name.split(|c: char| c == '_' || c == '-' || c.is_whitespace()))
}

fn capitalize_words<'a>(words: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for word in words {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
