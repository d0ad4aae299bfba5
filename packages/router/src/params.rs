//! Directory parameters captured while matching a path.

use std::collections::{btree_map, BTreeMap};

/// The value of a directory parameter.
///
/// A parameter that occurs once in a path holds a single value. When the same name occurs
/// several times the captured values are kept in encounter order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamValue {
    /// A parameter captured once.
    One(String),
    /// A parameter captured several times.
    Many(Vec<String>),
}

impl ParamValue {
    /// All values, in encounter order.
    pub fn values(&self) -> &[String] {
        match self {
            Self::One(value) => std::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }

    /// The value if this parameter was captured exactly once.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::One(value) => Some(value),
            Self::Many(_) => None,
        }
    }

    fn append(self, other: ParamValue) -> ParamValue {
        let mut values = match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        };
        match other {
            Self::One(value) => values.push(value),
            Self::Many(more) => values.extend(more),
        }
        Self::Many(values)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(String::from).collect())
    }
}

/// Directory parameters by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a parameter.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    /// Set a parameter, overwriting any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Remove a parameter.
    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.0.remove(name)
    }

    /// Add a value to a parameter, turning it into a list if it is already set.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        let value = value.into();
        match self.0.entry(name.into()) {
            btree_map::Entry::Vacant(entry) => {
                entry.insert(value);
            }
            btree_map::Entry::Occupied(mut entry) => {
                let previous = std::mem::replace(entry.get_mut(), ParamValue::Many(Vec::new()));
                *entry.get_mut() = previous.append(value);
            }
        }
    }

    /// Append every parameter of `other`, keeping the values of `self` first.
    pub fn merge(&mut self, other: Params) {
        for (name, value) in other.0 {
            self.append(name, value);
        }
    }

    /// Iterate over the parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// The number of distinct parameter names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether no parameter is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

impl IntoIterator for Params {
    type Item = (String, ParamValue);
    type IntoIter = btree_map::IntoIter<String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
