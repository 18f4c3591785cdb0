use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Remove every `<...>` tag from `text`. Entities such as `&amp;` are left alone,
/// and so is any whitespace around the removed tags.
pub fn strip(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}
