/// Folds a path or pattern fragment into the canonical form the matcher
/// compares: `\` becomes `/`, and unless `case_sensitive` is set every
/// character is simple-lower-cased (first scalar of `char::to_lowercase`).
///
/// Both sides of a comparison go through the same fold, so byte equality on
/// the result is exactly the matcher's character equality.
#[inline]
pub fn fold_path(input: &str, case_sensitive: bool) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        let ch = if ch == '\\' { '/' } else { ch };
        if case_sensitive {
            output.push(ch);
        } else {
            output.extend(ch.to_lowercase().take(1));
        }
    }
    output
}

/// Returns the final component of a path: everything after the last
/// separator, or the whole input when it has none.
#[inline]
pub fn file_name(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}
