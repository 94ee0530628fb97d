use std::collections::BTreeMap;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;

use crate::error::{QueryError, Result};

/// `key` or `key=value`, one `=` at most, both sides non-empty.
static TAG_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^=]*[^=\s])\s*(?:=\s*([^=]+))?$").unwrap());

/// One bracketed tag clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Tag {
    pub key: String,
    pub value: Option<String>,
}

impl Tag {
    /// Parse a single `key` or `key=value` token
    pub fn parse(token: &str) -> Result<Self> {
        let syntax_error = || QueryError::TagSyntax {
            token: token.to_string(),
        };
        let caps = TAG_TOKEN.captures(token.trim()).ok_or_else(syntax_error)?;
        let key = caps.get(1).ok_or_else(syntax_error)?.as_str().trim();
        let value = caps.get(2).map(|m| m.as_str().trim().to_string());
        Ok(Tag {
            key: key.to_string(),
            value,
        })
    }

    fn from_pair(key: String, value: Option<String>) -> Result<Self> {
        if key.trim().is_empty() || value.as_deref().is_some_and(|v| v.is_empty()) {
            let token = match &value {
                Some(v) => format!("{}={}", key, v),
                None => key,
            };
            return Err(QueryError::TagSyntax { token });
        }
        Ok(Tag { key, value })
    }

    /// Render as `["key"]` or `["key"="value"]`
    pub fn render(&self) -> String {
        match &self.value {
            Some(value) => format!("[\"{}\"=\"{}\"]", escape(&self.key), escape(value)),
            None => format!("[\"{}\"]", escape(&self.key)),
        }
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Ordered tag filter of a leaf statement.
///
/// Order is kept exactly as given; it is also the order of the bracketed
/// clauses in the printed query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct TagFilter(Vec<Tag>);

impl TagFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated token string such as `"highway,surface=gravel"`.
    ///
    /// A blank string is an empty filter.
    pub fn parse(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        Self::from_tokens(s.split(','))
    }

    /// Build from a list of `key` / `key=value` tokens
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tokens
            .into_iter()
            .map(|t| Tag::parse(t.as_ref()))
            .collect::<Result<Vec<_>>>()
            .map(TagFilter)
    }

    /// Build from `(key, optional value)` pairs, the mapping form
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .map(|(k, v)| Tag::from_pair(k.into(), v.map(Into::into)))
            .collect::<Result<Vec<_>>>()
            .map(TagFilter)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Concatenated bracket clauses
    pub fn render(&self) -> String {
        self.0.iter().map(Tag::render).collect()
    }
}

/// Anything a builder accepts as a tag filter.
pub trait IntoTagFilter {
    fn into_tag_filter(self) -> Result<TagFilter>;
}

impl IntoTagFilter for TagFilter {
    fn into_tag_filter(self) -> Result<TagFilter> {
        Ok(self)
    }
}

impl IntoTagFilter for &str {
    fn into_tag_filter(self) -> Result<TagFilter> {
        TagFilter::parse(self)
    }
}

impl IntoTagFilter for String {
    fn into_tag_filter(self) -> Result<TagFilter> {
        TagFilter::parse(&self)
    }
}

impl IntoTagFilter for &String {
    fn into_tag_filter(self) -> Result<TagFilter> {
        TagFilter::parse(self)
    }
}

impl IntoTagFilter for &[&str] {
    fn into_tag_filter(self) -> Result<TagFilter> {
        TagFilter::from_tokens(self)
    }
}

impl<const N: usize> IntoTagFilter for [&str; N] {
    fn into_tag_filter(self) -> Result<TagFilter> {
        TagFilter::from_tokens(self)
    }
}

impl IntoTagFilter for Vec<&str> {
    fn into_tag_filter(self) -> Result<TagFilter> {
        TagFilter::from_tokens(self)
    }
}

impl IntoTagFilter for Vec<String> {
    fn into_tag_filter(self) -> Result<TagFilter> {
        TagFilter::from_tokens(self)
    }
}

impl<K: Into<String>, V: Into<String>> IntoTagFilter for IndexMap<K, Option<V>> {
    fn into_tag_filter(self) -> Result<TagFilter> {
        TagFilter::from_pairs(self)
    }
}

impl<K: Into<String>, V: Into<String>> IntoTagFilter for BTreeMap<K, Option<V>> {
    fn into_tag_filter(self) -> Result<TagFilter> {
        TagFilter::from_pairs(self)
    }
}

impl<K: Into<String>, V: Into<String>> IntoTagFilter for Vec<(K, Option<V>)> {
    fn into_tag_filter(self) -> Result<TagFilter> {
        TagFilter::from_pairs(self)
    }
}

impl<T: IntoTagFilter> IntoTagFilter for Option<T> {
    fn into_tag_filter(self) -> Result<TagFilter> {
        match self {
            Some(tags) => tags.into_tag_filter(),
            None => Ok(TagFilter::default()),
        }
    }
}
