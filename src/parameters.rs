use std::collections::btree_map::{BTreeMap, Iter};

use crate::error::{Error, Result};

/// Request parameters that participate in signing (query string or form body).
///
/// Values are raw, unencoded strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestParams {
    inner: BTreeMap<String, String>,
}

impl RequestParams {
    pub fn new() -> Self {
        RequestParams::default()
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> &mut Self {
        self.inner.insert(key.into(), value.into());
        self
    }

    pub fn with<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, String> {
        self.inner.iter()
    }

    /// Accept a JSON object whose values are all strings.
    ///
    /// Numbers, booleans, null, arrays and nested objects are rejected rather than
    /// stringified, since their rendering would be ambiguous on the wire.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            Error::InvalidParameter(format!("request parameters must be an object, got {}", value))
        })?;
        let mut params = RequestParams::new();
        for (k, v) in object {
            match v.as_str() {
                Some(s) => {
                    params.insert(k.as_str(), s);
                }
                None => {
                    return Err(Error::InvalidParameter(format!(
                        "parameter {:?} must be a string, got {}",
                        k, v
                    )))
                }
            }
        }
        Ok(params)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RequestParams {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<BTreeMap<String, String>> for RequestParams {
    fn from(inner: BTreeMap<String, String>) -> Self {
        RequestParams { inner }
    }
}

impl<'a> IntoIterator for &'a RequestParams {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
