// src/filter.rs

/// Keeps builds whose site or build name mentions one of the target tokens.
///
/// Matching is a case-insensitive substring test against `"{site} {build_name}"`;
/// several tokens act as an OR. An empty token list matches nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteFilter {
    tokens: Vec<String>,
}

impl SiteFilter {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = tokens
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn matches(&self, site: &str, build_name: &str) -> bool {
        let combined = format!("{site} {build_name}").to_lowercase();
        self.tokens.iter().any(|t| combined.contains(t.as_str()))
    }
}
