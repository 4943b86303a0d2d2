use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};

/// Free-text searches shorter than this (after trimming) are ignored.
pub const MIN_SEARCH_LENGTH: usize = 3;

const FRENCH_COUNTRY_CODE: &str = "+33";

/// Escape LIKE wildcards so user input only matches literally.
/// Escapes: \ first, then % (match any) and _ (match single char)
fn escape_like_wildcards(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// `%term%` pattern, lowercased and escaped, for use with `ESCAPE '\'`.
#[must_use]
pub fn contains_pattern(term: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like_wildcards(&term.to_lowercase()))).escape('\\')
}

/// Case-insensitive `LOWER(expr) LIKE '%term%'`.
pub fn build_like_condition(expr: impl Into<SimpleExpr>, term: &str) -> SimpleExpr {
    Expr::expr(Func::lower(expr)).like(contains_pattern(term))
}

/// Trimmed search term, or `None` when it is too short to search on.
#[must_use]
pub fn search_term(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (trimmed.chars().count() >= MIN_SEARCH_LENGTH).then(|| trimmed.to_string())
}

/// Strip a `+33` prefix then one leading `0`, so local and international
/// forms of a French phone number search the same digits.
#[must_use]
pub fn normalize_customer_search(term: &str) -> String {
    let without_country = term.strip_prefix(FRENCH_COUNTRY_CODE).unwrap_or(term);
    without_country
        .strip_prefix('0')
        .unwrap_or(without_country)
        .to_string()
}

/// In-memory counterpart of [`build_like_condition`].
#[must_use]
pub fn contains_ignore_case(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(&term.to_lowercase())
}
