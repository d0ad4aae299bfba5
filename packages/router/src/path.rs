//! Path string helpers.

use std::{collections::HashMap, fmt};

use crate::{
    params::{ParamValue, Params},
    Result, RouteError,
};

/// Split a path into its tokens.
///
/// Tokens are separated by `/`, trimmed, and empty tokens are dropped, so `/a//b/` and `a/b`
/// produce the same tokens.
pub(crate) fn tokenize(path: &str) -> Vec<&str> {
    path.split('/')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// The parameter name declared by a token such as `:id`.
pub(crate) fn param_name(token: &str) -> Option<&str> {
    token.strip_prefix(':').map(str::trim)
}

/// A route path, possibly containing `:name` parameter tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoutePath(String);

impl RoutePath {
    /// Create a route path.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert the path into its string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Check whether the path is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The tokens of the path.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        tokenize(&self.0).into_iter()
    }

    /// Check whether the path declares any parameter tokens.
    pub fn has_params(&self) -> bool {
        self.tokens().any(|token| param_name(token).is_some())
    }

    /// Append `other`, putting exactly one `/` between the two.
    ///
    /// ```rust
    /// # use wayfinder_router::path::RoutePath;
    /// assert_eq!(RoutePath::new("/a/").concat("/b").as_str(), "/a/b");
    /// assert_eq!(RoutePath::new("/a").concat("b").as_str(), "/a/b");
    /// assert_eq!(RoutePath::new("").concat("b").as_str(), "b");
    /// ```
    pub fn concat(&self, other: impl AsRef<str>) -> RoutePath {
        let base = self.0.as_str();
        let relative = other.as_ref();

        if base.is_empty() || relative.is_empty() {
            return RoutePath(format!("{base}{relative}"));
        }

        match (base.ends_with('/'), relative.starts_with('/')) {
            (true, true) => RoutePath(format!("{base}{}", &relative[1..])),
            (false, false) => RoutePath(format!("{base}/{relative}")),
            _ => RoutePath(format!("{base}{relative}")),
        }
    }

    /// Substitute every `:name` token with the value of `params[name]`.
    ///
    /// The k-th occurrence of a name takes the k-th element of a list value. A single value
    /// only covers the first occurrence.
    pub fn dispatch(&self, params: &Params) -> Result<RoutePath> {
        if !self.has_params() {
            return Ok(self.clone());
        }

        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut tokens = Vec::new();
        for token in self.0.split('/') {
            let Some(name) = param_name(token.trim()) else {
                tokens.push(token);
                continue;
            };

            let occurrence = seen.entry(name).or_default();
            let index = *occurrence;
            *occurrence += 1;

            let value = match params.get(name) {
                Some(ParamValue::One(value)) if index == 0 => Some(value.as_str()),
                Some(ParamValue::Many(values)) => values.get(index).map(String::as_str),
                _ => None,
            };
            let Some(value) = value else {
                return Err(RouteError::MissingParameter {
                    name: name.to_string(),
                    template: self.0.clone(),
                });
            };
            tokens.push(value);
        }

        Ok(RoutePath(tokens.join("/")))
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoutePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoutePath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl From<String> for RoutePath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl From<RoutePath> for String {
    fn from(path: RoutePath) -> Self {
        path.0
    }
}
