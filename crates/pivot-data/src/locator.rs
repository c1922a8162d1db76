//! Sheet lookup by loosely matched label.

/// Collapse whitespace runs to a single space, trim, and uppercase.
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Index of the sheet matching `expected`.
///
/// An exact match on the normalised names wins; otherwise the first sheet
/// whose normalised name contains the normalised label is returned.
pub fn locate<S: AsRef<str>>(sheet_names: &[S], expected: &str) -> Option<usize> {
    let wanted = normalize_label(expected);
    let normalised: Vec<String> = sheet_names
        .iter()
        .map(|name| normalize_label(name.as_ref()))
        .collect();

    normalised
        .iter()
        .position(|name| *name == wanted)
        .or_else(|| normalised.iter().position(|name| name.contains(&wanted)))
}
