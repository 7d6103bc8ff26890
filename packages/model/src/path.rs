//! Addressing values inside a nested model.
//!
//! A [`Path`] is a sequence of [`Seg`]s. Object keys and array indices are
//! interchangeable the way they are for string-keyed data: a numeric key
//! addresses an array element and an index addresses the object key with the
//! same decimal spelling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single step into the model.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seg {
    Key(String),
    Index(usize),
}

impl Seg {
    pub fn key(k: impl Into<String>) -> Self {
        Seg::Key(k.into())
    }

    pub fn index(i: usize) -> Self {
        Seg::Index(i)
    }

    /// Array position this segment denotes, if any.
    ///
    /// Keys made only of ASCII digits count as positions.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Seg::Index(i) => Some(*i),
            Seg::Key(k) if !k.is_empty() && k.bytes().all(|b| b.is_ascii_digit()) => k.parse().ok(),
            Seg::Key(_) => None,
        }
    }

    /// Object key this segment denotes
    pub fn as_key(&self) -> std::borrow::Cow<'_, str> {
        match self {
            Seg::Key(k) => std::borrow::Cow::Borrowed(k),
            Seg::Index(i) => std::borrow::Cow::Owned(i.to_string()),
        }
    }
}

impl fmt::Display for Seg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seg::Key(k) => f.write_str(k),
            Seg::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<String> for Seg {
    fn from(s: String) -> Self {
        Seg::Key(s)
    }
}

impl From<&str> for Seg {
    fn from(s: &str) -> Self {
        Seg::Key(s.to_owned())
    }
}

impl From<usize> for Seg {
    fn from(i: usize) -> Self {
        Seg::Index(i)
    }
}

/// Location of a value in the model.
///
/// ```
/// use formwire_model::Path;
///
/// let path = Path::parse("children.0.name");
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.to_string(), "children.0.name");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Path(Vec<Seg>);

impl Path {
    /// The root path (no segments)
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_segments(segments: Vec<Seg>) -> Self {
        Self(segments)
    }

    /// Parse a dotted name such as `"address.street"`.
    ///
    /// Numeric parts become index segments. Empty parts are skipped, so `""`
    /// is the root path.
    pub fn parse(name: &str) -> Self {
        Self(
            name.split('.')
                .filter(|part| !part.is_empty())
                .map(|part| match part.parse::<usize>() {
                    Ok(i) if part.bytes().all(|b| b.is_ascii_digit()) => Seg::Index(i),
                    _ => Seg::Key(part.to_owned()),
                })
                .collect(),
        )
    }

    pub fn key(mut self, k: impl Into<String>) -> Self {
        self.0.push(Seg::Key(k.into()));
        self
    }

    pub fn index(mut self, i: usize) -> Self {
        self.0.push(Seg::Index(i));
        self
    }

    pub fn push(&mut self, seg: impl Into<Seg>) {
        self.0.push(seg.into());
    }

    pub fn join(&self, other: &Path) -> Path {
        let mut segments = self.0.clone();
        segments.extend(other.0.iter().cloned());
        Path(segments)
    }

    pub fn parent(&self) -> Option<Path> {
        self.0.split_last().map(|(_, rest)| Path(rest.to_vec()))
    }

    pub fn last(&self) -> Option<&Seg> {
        self.0.last()
    }

    pub fn segments(&self) -> &[Seg] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", seg)?;
        }
        Ok(())
    }
}

impl From<&str> for Path {
    fn from(name: &str) -> Self {
        Path::parse(name)
    }
}

impl From<Vec<Seg>> for Path {
    fn from(segments: Vec<Seg>) -> Self {
        Path(segments)
    }
}

impl FromIterator<Seg> for Path {
    fn from_iter<I: IntoIterator<Item = Seg>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

/// Compose a child path from an optional parent namespace and a relative name.
///
/// Root-level fields have no namespace.
pub fn create_path(namespace: Option<&Path>, name: &Path) -> Path {
    match namespace {
        Some(ns) if !ns.is_empty() => ns.join(name),
        _ => name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotted_name() {
        let path = Path::parse("children.12.name");
        assert_eq!(
            path.segments(),
            &[Seg::key("children"), Seg::index(12), Seg::key("name")]
        );
    }

    #[test]
    fn test_parse_empty_name_is_root() {
        assert!(Path::parse("").is_empty());
        assert_eq!(Path::parse("a..b").len(), 2);
    }

    #[test]
    fn test_create_path_without_namespace() {
        let name = Path::parse("name");
        assert_eq!(create_path(None, &name), name);
        assert_eq!(create_path(Some(&Path::root()), &name), name);
    }

    #[test]
    fn test_create_path_with_namespace() {
        let ns = Path::root().key("children").index(0);
        let path = create_path(Some(&ns), &Path::parse("address.street"));
        assert_eq!(path.to_string(), "children.0.address.street");
    }

    #[test]
    fn test_numeric_keys_act_as_indices() {
        assert_eq!(Seg::key("3").as_index(), Some(3));
        assert_eq!(Seg::key("3a").as_index(), None);
        assert_eq!(Seg::key("").as_index(), None);
        assert_eq!(Seg::index(7).as_key(), "7");
    }

    #[test]
    fn test_parent_and_last() {
        let path = Path::parse("a.b.c");
        assert_eq!(path.parent(), Some(Path::parse("a.b")));
        assert_eq!(path.last(), Some(&Seg::key("c")));
        assert_eq!(Path::root().parent(), None);
    }
}
