use serde_json::{json, Value};

use super::types::FilterData;

/// Text columns searched by [`MatchMode::AllFields`]
pub const PRODUCT_SEARCH_COLUMNS: &[&str] = &["name", "description"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Case-insensitive substring match on every descriptive text column
    AllFields,
    /// Substring match on the product name only
    NameOnly,
}

impl MatchMode {
    /// `all_words=on` selects [`MatchMode::AllFields`]; anything else is name-only
    pub fn from_all_words(all_words: Option<&str>) -> Self {
        match all_words {
            Some(v) if v.trim().eq_ignore_ascii_case("on") => MatchMode::AllFields,
            _ => MatchMode::NameOnly,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSearch {
    pub term: String,
    pub mode: MatchMode,
    pub case_sensitive_name_match: bool,
}

impl ProductSearch {
    pub fn new(term: impl Into<String>, mode: MatchMode, case_sensitive_name_match: bool) -> Self {
        Self {
            term: term.into(),
            mode,
            case_sensitive_name_match,
        }
    }

    /// `%term%` with LIKE wildcards in the term escaped
    pub fn like_pattern(&self) -> String {
        let mut escaped = String::with_capacity(self.term.len() + 2);
        escaped.push('%');
        for c in self.term.chars() {
            if matches!(c, '%' | '_' | '\\') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped.push('%');
        escaped
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.mode == MatchMode::NameOnly && self.case_sensitive_name_match
    }

    pub fn to_filter(&self) -> FilterData {
        let pattern = self.like_pattern();
        let where_clause: Value = match self.mode {
            MatchMode::AllFields => json!({
                "$or": PRODUCT_SEARCH_COLUMNS
                    .iter()
                    .map(|column| json!({ *column: { "$ilike": pattern } }))
                    .collect::<Vec<_>>()
            }),
            MatchMode::NameOnly => {
                let op = if self.is_case_sensitive() { "$like" } else { "$ilike" };
                json!({ "name": { op: pattern } })
            }
        };
        FilterData::default().with_where(where_clause).order_by("product_id")
    }
}
