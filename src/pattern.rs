use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use crate::{Error, Result};

/// Options governing how a path template is compiled.
#[derive(Debug, Clone, Copy)]
pub struct MatchOptions {
    /// Require the pattern to consume the whole path (`true` for routes,
    /// `false` for prefix mounts).
    pub end: bool,
    /// Treat a trailing slash as significant.
    pub strict: bool,
    /// Match case-sensitively.
    pub sensitive: bool,
}

/// A compiled path template.
///
/// Templates are `/`-separated literals with `:name` parameter segments,
/// e.g. `/users/:id/books`. A parameter matches one non-empty segment.
#[derive(Debug)]
pub struct Pattern {
    source: String,
    keys: Vec<String>,
    end: bool,
    matcher: Matcher,
}

#[derive(Debug)]
enum Matcher {
    /// The `/` prefix mount: matches every path, consumes nothing.
    Root,
    Regex(Regex),
}

/// Immutable result of a successful match, consumed by the acceptance step.
#[derive(Debug, Clone)]
pub struct PatternMatch {
    pub params: HashMap<String, String>,
    /// Byte offset one past the matched prefix.
    pub end_index: usize,
}

impl Pattern {
    pub(crate) fn root() -> Self {
        Self {
            source: "/".to_string(),
            keys: Vec::new(),
            end: false,
            matcher: Matcher::Root,
        }
    }

    pub fn compile(path: &str, options: MatchOptions) -> Result<Self> {
        if !path.starts_with('/') {
            return Err(Error::configuration(format!(
                "mount pattern must start with '/', got {path:?}"
            )));
        }
        if path == "/" && !options.end {
            return Ok(Self::root());
        }
        let trimmed = if !options.strict && path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        let mut keys = Vec::new();
        let mut source = String::from("^");
        for segment in trimmed.split('/').skip(1) {
            if let Some(name) = segment.strip_prefix(':') {
                if name.is_empty() {
                    return Err(Error::configuration(format!(
                        "empty parameter name in pattern {path:?}"
                    )));
                }
                keys.push(name.to_string());
                source.push_str("/([^/]+)");
            } else {
                source.push('/');
                source.push_str(&regex::escape(segment));
            }
        }
        if options.end {
            source.push_str(if options.strict { "$" } else { "/?$" });
        }
        let regex = RegexBuilder::new(&source)
            .case_insensitive(!options.sensitive)
            .build()
            .map_err(|error| {
                Error::configuration(format!("invalid pattern {path:?}: {error}"))
            })?;
        Ok(Self {
            source: path.to_string(),
            keys,
            end: options.end,
            matcher: Matcher::Regex(regex),
        })
    }

    /// The template this pattern was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, path: &str) -> Option<PatternMatch> {
        let regex = match &self.matcher {
            Matcher::Root => {
                return Some(PatternMatch {
                    params: HashMap::new(),
                    end_index: 0,
                });
            }
            Matcher::Regex(regex) => regex,
        };
        let captures = regex.captures(path)?;
        let matched = captures.get(0)?;
        let end_index = matched.end();
        if !self.end {
            // a prefix match must stop on a segment boundary
            let rest = &path[end_index..];
            if !rest.is_empty() && !rest.starts_with('/') {
                return None;
            }
        }
        let params = self
            .keys
            .iter()
            .zip(captures.iter().skip(1))
            .filter_map(|(key, value)| value.map(|value| (key.clone(), value.as_str().to_string())))
            .collect();
        Some(PatternMatch { params, end_index })
    }
}
