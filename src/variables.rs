//! # Variable Resolver
//!
//! Element content may contain `{token}` placeholders. At compile time every
//! key of a [`VariableMap`] is replaced, literally and globally, by its value.
//!
//! ```
//! use labelsmith::variables::VariableMap;
//!
//! let mut vars = VariableMap::new();
//! vars.insert("{name}", "Ada");
//! assert_eq!(vars.resolve("Hi {name}, {name}!"), "Hi Ada, Ada!");
//! assert_eq!(vars.resolve("{unknown}"), "{unknown}");
//! ```
//!
//! ## Ordering
//!
//! Keys are applied one after another in lexicographic key order, each over
//! the output of the previous one. When one key is a substring of another,
//! or a value contains another key, the result depends on that order. The
//! order is fixed so output is reproducible; the overlap itself is not
//! resolved.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Seed variables available in every session: (key, sample value). Date and
/// time keys are filled from the clock instead.
pub const SEED_VARIABLES: &[(&str, &str)] = &[
    ("{company}", "ACME Corp"),
    ("{product}", "Product Name"),
    ("{price}", "$9.99"),
    ("{sku}", "SKU-000123"),
    ("{batch}", "B-0001"),
];

/// Token → replacement mapping. Keys include their braces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableMap {
    entries: BTreeMap<String, String>,
}

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed set (including `{date}`, `{time}`, `{datetime}` at `now`)
    /// overlaid with operator-defined `custom` entries.
    pub fn with_defaults(now: DateTime<Local>, custom: &VariableMap) -> Self {
        let mut vars = Self::new();
        vars.insert("{date}", now.format("%Y-%m-%d").to_string());
        vars.insert("{time}", now.format("%H:%M").to_string());
        vars.insert("{datetime}", now.format("%Y-%m-%d %H:%M").to_string());
        for (key, value) in SEED_VARIABLES {
            vars.insert(*key, *value);
        }
        vars.extend(custom);
        vars
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Copy every entry of `other` over this map.
    pub fn extend(&mut self, other: &VariableMap) {
        for (k, v) in other.iter() {
            self.entries.insert(k.to_string(), v.to_string());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Substitute every key in `text`. See [`resolve`].
    pub fn resolve(&self, text: &str) -> String {
        resolve(text, self)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Replace all non-overlapping occurrences of each key with its value,
/// treating keys as literal strings. Empty text is returned unchanged and
/// empty keys are skipped.
pub fn resolve(text: &str, vars: &VariableMap) -> String {
    if text.is_empty() {
        return String::new();
    }
    let mut out = text.to_string();
    for (key, value) in vars.iter() {
        if key.is_empty() || !out.contains(key) {
            continue;
        }
        out = out.replace(key, value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_replaces_all_occurrences() {
        let vars: VariableMap = [("{a}", "1"), ("{b}", "2")].into_iter().collect();
        assert_eq!(resolve("{a}{b}{a}-{b}", &vars), "121-2");
    }

    #[test]
    fn test_literal_not_regex() {
        let vars: VariableMap = [("$.*", "X"), ("(", "[")].into_iter().collect();
        assert_eq!(resolve("a$.*b(c", &vars), "aXb[c");
    }

    #[test]
    fn test_empty_text_and_empty_key() {
        let vars: VariableMap = [("", "boom"), ("{x}", "y")].into_iter().collect();
        assert_eq!(resolve("", &vars), "");
        assert_eq!(resolve("ab{x}", &vars), "aby");
    }

    #[test]
    fn test_overlapping_keys_follow_key_order() {
        // "{id}" sorts before "{id}x", so the shorter key wins.
        let vars: VariableMap = [("{id}x", "LONG"), ("{id}", "S")].into_iter().collect();
        assert_eq!(resolve("{id}x", &vars), "Sx");
    }

    #[test]
    fn test_defaults_with_custom_override() {
        let now = Local.with_ymd_and_hms(2026, 3, 4, 9, 5, 0).unwrap();
        let custom: VariableMap = [("{company}", "Initech"), ("{lot}", "7")].into_iter().collect();
        let vars = VariableMap::with_defaults(now, &custom);
        assert_eq!(vars.get("{date}"), Some("2026-03-04"));
        assert_eq!(vars.get("{time}"), Some("09:05"));
        assert_eq!(vars.get("{company}"), Some("Initech"));
        assert_eq!(vars.get("{lot}"), Some("7"));
        assert_eq!(vars.get("{sku}"), Some("SKU-000123"));
    }

    #[test]
    fn test_serde_transparent() {
        let vars: VariableMap = [("{k}", "v")].into_iter().collect();
        assert_eq!(serde_json::to_string(&vars).unwrap(), r#"{"{k}":"v"}"#);
    }
}
