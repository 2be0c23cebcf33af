use std::collections::BTreeMap;

use procura_core::{AppError, AppResult};

/// Name-based role comparison shared by every string-list role check.
///
/// Names are normalized before comparison (trimmed, ASCII upper-cased, with
/// spaces and `-` folded to `_`), so `"ADMIN"`, `"Admin"` and `" admin "` are
/// the same name. Synonyms map an alias onto a canonical name; resolution is
/// a single step, aliases of aliases are not followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleNameMatcher {
    synonyms: BTreeMap<String, String>,
}

impl RoleNameMatcher {
    /// Synonym pairs applied when no configuration overrides them.
    pub const DEFAULT_SYNONYMS: &'static [(&'static str, &'static str)] =
        &[("ADMINISTRATOR", "ADMIN")];

    /// Creates a matcher with the default synonym table.
    #[must_use]
    pub fn new() -> Self {
        Self::DEFAULT_SYNONYMS
            .iter()
            .fold(Self::without_synonyms(), |matcher, (alias, canonical)| {
                matcher.with_synonym(alias, canonical)
            })
    }

    /// Creates a matcher that only normalizes case and separators.
    #[must_use]
    pub fn without_synonyms() -> Self {
        Self {
            synonyms: BTreeMap::new(),
        }
    }

    /// Returns the matcher with one more alias.
    #[must_use]
    pub fn with_synonym(mut self, alias: &str, canonical: &str) -> Self {
        let alias = normalize(alias);
        let canonical = normalize(canonical);
        if !alias.is_empty() && !canonical.is_empty() && alias != canonical {
            self.synonyms.insert(alias, canonical);
        }
        self
    }

    /// Parses `ALIAS=CANONICAL` pairs separated by commas, as read from
    /// configuration.
    pub fn parse_synonyms(config: &str) -> AppResult<Vec<(String, String)>> {
        config
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (alias, canonical) = entry.split_once('=').ok_or_else(|| {
                    AppError::Validation(format!(
                        "role synonym '{entry}' must have the form ALIAS=CANONICAL"
                    ))
                })?;
                let (alias, canonical) = (alias.trim(), canonical.trim());
                if alias.is_empty() || canonical.is_empty() {
                    return Err(AppError::Validation(format!(
                        "role synonym '{entry}' must name both an alias and a canonical role"
                    )));
                }

                Ok((alias.to_owned(), canonical.to_owned()))
            })
            .collect()
    }

    /// Returns the canonical form of a role name.
    #[must_use]
    pub fn canonical(&self, name: &str) -> String {
        let normalized = normalize(name);
        self.synonyms.get(&normalized).cloned().unwrap_or(normalized)
    }

    /// Returns whether two role names denote the same role.
    #[must_use]
    pub fn matches(&self, left: &str, right: &str) -> bool {
        let left = self.canonical(left);
        !left.is_empty() && left == self.canonical(right)
    }

    /// Returns whether `name` matches any of `candidates`.
    #[must_use]
    pub fn matches_any<S: AsRef<str>>(&self, name: &str, candidates: &[S]) -> bool {
        candidates
            .iter()
            .any(|candidate| self.matches(name, candidate.as_ref()))
    }

    /// Returns the configured alias table in alias order.
    pub fn synonyms(&self) -> impl Iterator<Item = (&str, &str)> {
        self.synonyms
            .iter()
            .map(|(alias, canonical)| (alias.as_str(), canonical.as_str()))
    }
}

impl Default for RoleNameMatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|character| match character {
            ' ' | '-' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}
