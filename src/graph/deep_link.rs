//! Deep-link route patterns.
//!
//! A pattern is a route with `{name}` placeholders for whole path segments, an
//! optional trailing `*` that swallows the remaining segments, and optional
//! query placeholders:
//!
//! ```text
//! app://duo/users/{id}
//! app://duo/leaderboard?sort={order}
//! app://duo/help/*
//! ```
//!
//! Placeholders are parsed with the type the destination declares for that
//! argument (string when undeclared); a segment that fails to parse is not a
//! match.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::{NavError, NavResult};
use crate::graph::args::{ArgType, Args, Argument};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
    wildcard: bool,
    /// query key -> argument name
    query: Vec<(String, String)>,
}

/// How specific a pattern is. Greater is more specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity {
    literals: usize,
    segments: usize,
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.trim_end_matches('/').split('/')
}

fn placeholder(s: &str) -> Option<&str> {
    s.strip_prefix('{')?.strip_suffix('}').filter(|n| !n.is_empty())
}

impl RoutePattern {
    pub fn parse(raw: &str) -> NavResult<Self> {
        let malformed = |why: &str| NavError::MalformedGraph(format!("deep link \"{raw}\": {why}"));
        if raw.trim().is_empty() {
            return Err(malformed("empty pattern"));
        }

        let (path, query) = match raw.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (raw, None),
        };

        let mut segments = Vec::new();
        let mut wildcard = false;
        for part in split_path(path) {
            if wildcard {
                return Err(malformed("'*' must be the last segment"));
            }
            if part == "*" {
                wildcard = true;
            } else if let Some(name) = placeholder(part) {
                segments.push(Segment::Param(name.to_string()));
            } else if part.contains('{') || part.contains('}') {
                return Err(malformed("placeholders must span a whole segment"));
            } else {
                segments.push(Segment::Literal(part.to_string()));
            }
        }

        let mut query_params = Vec::new();
        if let Some(q) = query {
            for pair in q.split('&').filter(|p| !p.is_empty()) {
                let (key, value) = pair
                    .split_once('=')
                    .ok_or_else(|| malformed("query parameters need key={name}"))?;
                let name = placeholder(value)
                    .ok_or_else(|| malformed("query values must be placeholders"))?;
                query_params.push((key.to_string(), name.to_string()));
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
            wildcard,
            query: query_params,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn specificity(&self) -> Specificity {
        Specificity {
            literals: self
                .segments
                .iter()
                .filter(|s| matches!(s, Segment::Literal(_)))
                .count(),
            segments: self.segments.len(),
        }
    }

    /// Argument names this pattern can extract.
    pub fn arg_names(&self) -> impl Iterator<Item = &str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param(n) => Some(n.as_str()),
                Segment::Literal(_) => None,
            })
            .chain(self.query.iter().map(|(_, n)| n.as_str()))
    }

    /// Matches `route`, returning the extracted arguments.
    pub fn matches(&self, route: &str, declared: &BTreeMap<String, Argument>) -> Option<Args> {
        let (path, query) = match route.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (route, None),
        };
        let parts: Vec<&str> = split_path(path).collect();

        if parts.len() < self.segments.len() || (!self.wildcard && parts.len() != self.segments.len()) {
            return None;
        }

        let ty_of = |name: &str| declared.get(name).map(|a| a.ty).unwrap_or(ArgType::Str);
        let mut args = Args::new();
        for (seg, part) in self.segments.iter().zip(&parts) {
            match seg {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    args.insert(name.clone(), ty_of(name).parse(part)?);
                }
            }
        }

        if let Some(q) = query {
            for pair in q.split('&') {
                let Some((key, value)) = pair.split_once('=') else {
                    continue;
                };
                if let Some((_, name)) = self.query.iter().find(|(k, _)| k == key) {
                    args.insert(name.clone(), ty_of(name).parse(value)?);
                }
            }
        }
        Some(args)
    }
}

/// A registered pattern plus its global registration order.
#[derive(Debug, Clone)]
pub struct DeepLink {
    pub pattern: RoutePattern,
    pub order: usize,
}

/// Picks the better of two candidates: higher specificity wins, ties go to the
/// earlier registration.
pub(crate) fn better(a: (Specificity, usize), b: (Specificity, usize)) -> Ordering {
    a.0.cmp(&b.0).then(b.1.cmp(&a.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_args() -> BTreeMap<String, Argument> {
        BTreeMap::new()
    }

    #[test]
    fn test_literal_match() {
        let p = RoutePattern::parse("app://duo/dashboard").unwrap();
        assert!(p.matches("app://duo/dashboard", &no_args()).is_some());
        assert!(p.matches("app://duo/dashboard/", &no_args()).is_some());
        assert!(p.matches("app://duo/register", &no_args()).is_none());
    }

    #[test]
    fn test_placeholder_extracts_typed_arg() {
        let p = RoutePattern::parse("app://duo/users/{id}").unwrap();
        let mut declared = BTreeMap::new();
        declared.insert("id".to_string(), Argument::new(ArgType::Int));

        let args = p.matches("app://duo/users/17", &declared).unwrap();
        assert_eq!(args.get("id").and_then(|v| v.as_int()), Some(17));
        assert!(p.matches("app://duo/users/abc", &declared).is_none());
        assert!(p.matches("app://duo/users/", &declared).is_none());
    }

    #[test]
    fn test_query_placeholder_is_optional() {
        let p = RoutePattern::parse("app://duo/leaderboard?sort={order}").unwrap();
        let args = p.matches("app://duo/leaderboard?sort=desc", &no_args()).unwrap();
        assert_eq!(args.get("order").and_then(|v| v.as_str()), Some("desc"));
        let args = p.matches("app://duo/leaderboard", &no_args()).unwrap();
        assert!(args.is_empty());
    }

    #[test]
    fn test_wildcard_swallows_rest() {
        let p = RoutePattern::parse("app://duo/help/*").unwrap();
        assert!(p.matches("app://duo/help/a/b/c", &no_args()).is_some());
        assert!(p.matches("app://duo/help", &no_args()).is_some());
        assert!(p.matches("app://duo/other", &no_args()).is_none());
    }

    #[test]
    fn test_malformed_patterns() {
        assert!(RoutePattern::parse("").is_err());
        assert!(RoutePattern::parse("app://duo/*/x").is_err());
        assert!(RoutePattern::parse("app://duo/u{id}").is_err());
        assert!(RoutePattern::parse("app://duo/x?sort").is_err());
    }

    #[test]
    fn test_specificity_prefers_literals() {
        let exact = RoutePattern::parse("app://duo/users/me").unwrap();
        let param = RoutePattern::parse("app://duo/users/{id}").unwrap();
        let wild = RoutePattern::parse("app://duo/*").unwrap();
        assert!(exact.specificity() > param.specificity());
        assert!(param.specificity() > wild.specificity());
    }

    #[test]
    fn test_ties_go_to_first_registered() {
        let s = RoutePattern::parse("app://duo/{a}").unwrap().specificity();
        assert_eq!(better((s, 0), (s, 1)), Ordering::Greater);
        assert_eq!(better((s, 3), (s, 1)), Ordering::Less);
    }
}
