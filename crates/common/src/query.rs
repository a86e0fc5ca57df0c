//! Query-string helpers for list pages and login redirects.

use std::borrow::Cow;

/// Ordered query parameters as received, repeated keys included.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new(pairs: Vec<(String, String)>) -> Self { Self { pairs } }

    /// Last value wins for repeated keys.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Replace every value of `key` with `value`, or drop the key when `value` is `None`.
    /// The key keeps the position of its first occurrence.
    pub fn with(&self, key: &str, value: Option<&str>) -> Self {
        let mut pairs = Vec::with_capacity(self.pairs.len() + 1);
        let mut placed = false;
        for (k, v) in &self.pairs {
            if k != key {
                pairs.push((k.clone(), v.clone()));
                continue;
            }
            if let (Some(value), false) = (value, placed) {
                pairs.push((k.clone(), value.to_string()));
                placed = true;
            }
        }
        if let (Some(value), false) = (value, placed) {
            pairs.push((key.to_string(), value.to_string()));
        }
        Self { pairs }
    }

    /// Pairs whose key is not in `excluded`.
    pub fn without(&self, excluded: &[&str]) -> Vec<(String, String)> {
        self.pairs
            .iter()
            .filter(|(k, _)| !excluded.contains(&k.as_str()))
            .cloned()
            .collect()
    }

    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Location of the login page carrying the originally requested path and query.
pub fn login_redirect(login_url: &str, path: &str, query: Option<&str>) -> String {
    let next: Cow<'_, str> = match query {
        Some(q) if !q.is_empty() => Cow::Owned(format!("{path}?{q}")),
        _ => Cow::Borrowed(path),
    };
    format!("{login_url}?next={}", urlencoding::encode(&next))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        QueryParams::new(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn with_replaces_in_place_and_drops_duplicates() {
        let q = params(&[("search", "a"), ("page", "1"), ("color", "blue"), ("page", "2")]);
        assert_eq!(q.with("page", Some("3")).encode(), "search=a&page=3&color=blue");
        assert_eq!(q.with("page", None).encode(), "search=a&color=blue");
        assert_eq!(params(&[("color", "blue")]).with("page", Some("2")).encode(), "color=blue&page=2");
    }

    #[test]
    fn without_keeps_unrelated_parameters() {
        let q = params(&[("search", "usertest"), ("color", "blue"), ("page", "2")]);
        assert_eq!(q.without(&["search", "page"]), vec![("color".to_string(), "blue".to_string())]);
    }

    #[test]
    fn get_prefers_last_value() {
        let q = params(&[("page", "1"), ("page", "4")]);
        assert_eq!(q.get("page"), Some("4"));
        assert_eq!(q.get("search"), None);
    }

    #[test]
    fn encode_escapes_reserved_characters() {
        assert_eq!(params(&[("search", "a b&c")]).encode(), "search=a%20b%26c");
    }

    #[test]
    fn login_redirect_round_trips_next() {
        let loc = login_redirect("/accounts/login", "/drivers", Some("search=x&page=2"));
        assert_eq!(loc, "/accounts/login?next=%2Fdrivers%3Fsearch%3Dx%26page%3D2");
        let next = loc.split_once("next=").map(|(_, n)| n).unwrap_or_default();
        assert_eq!(urlencoding::decode(next).unwrap(), "/drivers?search=x&page=2");
        assert_eq!(login_redirect("/accounts/login", "/", None), "/accounts/login?next=%2F");
    }
}
