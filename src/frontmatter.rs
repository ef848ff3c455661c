//! Front-matter stripping.
//!
//! A note's front matter is whatever sits between the first and second
//! occurrence of [`DELIMITER`]. Everything after the second occurrence is the
//! body, kept verbatim (later delimiters, such as horizontal rules, stay in
//! the body). A note with fewer than two delimiters has no front matter and
//! its whole text is the body.

pub const DELIMITER: &str = "---";

/// Split `text` into `(front_matter, body)`.
pub fn split_front_matter(text: &str) -> (Option<&str>, &str) {
    let mut segments = text.splitn(3, DELIMITER);
    match (segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(front_matter), Some(body)) => (Some(front_matter), body),
        _ => (None, text),
    }
}

/// The part of `text` that should be read aloud.
pub fn strip_front_matter(text: &str) -> &str {
    split_front_matter(text).1
}
