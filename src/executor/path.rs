use std::{fmt, sync::Arc};

use arcstr::ArcStr;

/// Segment of a response path: a response key or a list index.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum PathSegment {
    /// Response key of a field.
    Key(ArcStr),
    /// Position in a list.
    Index(usize),
}

/// Location of a value in the response, from the root.
///
/// Paths are persistent linked lists walked from leaf to root: extending a
/// path shares its parent, so every field keeps its own path at the cost of a
/// single allocation.
#[derive(Clone, Default)]
pub struct Path(Option<Arc<PathNode>>);

struct PathNode {
    segment: PathSegment,
    /// Position of the segment among its siblings, in response order.
    ordinal: usize,
    parent: Path,
    len: usize,
}

impl Path {
    /// Empty path of the response root.
    pub fn root() -> Self {
        Self(None)
    }

    /// Path to the field with the response key `key`, the `ordinal`-th key of
    /// the object at this path.
    #[must_use]
    pub fn key(&self, key: impl Into<ArcStr>, ordinal: usize) -> Self {
        self.push(PathSegment::Key(key.into()), ordinal)
    }

    /// Path to the `index`-th item of the list at this path.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.push(PathSegment::Index(index), index)
    }

    fn push(&self, segment: PathSegment, ordinal: usize) -> Self {
        Self(Some(Arc::new(PathNode {
            segment,
            ordinal,
            parent: self.clone(),
            len: self.len() + 1,
        })))
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.as_ref().map_or(0, |n| n.len)
    }

    /// Whether this is the root path.
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Last segment, if any.
    pub fn last(&self) -> Option<&PathSegment> {
        self.0.as_ref().map(|n| &n.segment)
    }

    fn nodes(&self) -> Vec<&PathNode> {
        let mut nodes = Vec::with_capacity(self.len());
        let mut cur = self;
        while let Some(node) = &cur.0 {
            nodes.push(&**node);
            cur = &node.parent;
        }
        nodes.reverse();
        nodes
    }

    /// Segments from the root.
    pub fn segments(&self) -> Vec<PathSegment> {
        self.nodes().into_iter().map(|n| n.segment.clone()).collect()
    }

    /// Positions of the segments in response order, from the root. Sorting by
    /// these orders paths the way their values appear in the response.
    pub(crate) fn ordinals(&self) -> Vec<usize> {
        self.nodes().into_iter().map(|n| n.ordinal).collect()
    }

    /// Whether `prefix` is this path or one of its ancestors.
    pub fn starts_with(&self, prefix: &Self) -> bool {
        let (len, prefix_len) = (self.len(), prefix.len());
        if prefix_len > len {
            return false;
        }
        let mut cur = self;
        for _ in prefix_len..len {
            match &cur.0 {
                Some(node) => cur = &node.parent,
                None => return false,
            }
        }
        cur == prefix
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                Arc::ptr_eq(a, b)
                    || (a.len == b.len && a.segment == b.segment && a.parent == b.parent)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.segments()).finish()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments().iter().enumerate() {
            match segment {
                PathSegment::Key(k) if i == 0 => write!(f, "{k}")?,
                PathSegment::Key(k) => write!(f, ".{k}")?,
                PathSegment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => write!(f, "{k}"),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(k: &str) -> Self {
        Self::Key(k.into())
    }
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}
