use std::fmt::{Display, Formatter};

/// One segment of a [`Query`] path: a tag name, optionally restricted to one occurrence of it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathStep {
    pub name: String,
    /// `None` matches every occurrence; `Some(n)` matches only the `n`th (0-based) one.
    pub index: Option<usize>,
}

impl PathStep {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
        }
    }

    pub fn indexed(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index: Some(index),
        }
    }
}

impl Display for PathStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.index {
            None => f.write_str(&self.name),
            Some(idx) => write!(f, "{}[{idx}]", self.name),
        }
    }
}

/// What to produce for the elements a [`Query`]'s path resolves to.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SearchType {
    /// The distinct names of the target's direct children, in first-seen order.
    TagNames,
    /// The target's tags and text, re-indented.
    SubtreeContent,
    /// The distinct attribute names on the target, in first-seen order.
    AttributeNames,
    /// The value of the named attribute on the target, where present and non-empty.
    AttributeValue(String),
}

/// The in-memory form of an `xq` query string like `catalog.book[2]#id`.
///
/// An empty path means the whole document is rendered, regardless of the search type.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Query {
    pub path: Vec<PathStep>,
    pub search_type: SearchType,
}

impl Query {
    pub fn new(path: Vec<PathStep>, search_type: SearchType) -> Self {
        Self { path, search_type }
    }

    /// A query that renders the full document.
    pub fn full_document() -> Self {
        Self::new(Vec::new(), SearchType::SubtreeContent)
    }

    pub fn is_full_document(&self) -> bool {
        self.path.is_empty()
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            f.write_str(".")?;
        }
        for (i, step) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{step}")?;
        }
        if let SearchType::AttributeValue(attr) = &self.search_type {
            write!(f, "#{attr}")?;
        }
        Ok(())
    }
}
