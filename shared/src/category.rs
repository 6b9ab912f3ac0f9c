//! Category name normalization
//!
//! Category names arrive from admin forms, spreadsheets and product pages with
//! typographic quotes, dashes and stray whitespace. Every store insert and every
//! lookup goes through [`normalize_category`] so the two sides always agree.
//! Matching after normalization is case-sensitive.

/// Canonical form of a category name.
pub fn normalize_category(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_space = false;

    for ch in value.chars() {
        let mapped = match ch {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{2033}' => '"',
            '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            '\u{200B}'..='\u{200D}' | '\u{FEFF}' => continue,
            c if c.is_whitespace() => {
                pending_space = true;
                continue;
            }
            c => c,
        };

        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(mapped);
    }

    out
}
