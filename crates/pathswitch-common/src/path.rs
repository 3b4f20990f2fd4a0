//! Candidate path identifiers
//!
//! The candidate set is closed: every path the engine can select is a
//! variant of [`PathId`], and per-path values live in a [`PathTable`]
//! indexed by that variant.

use crate::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// Candidate path identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum PathId {
    /// First candidate (satellite uplink in the reference topology)
    #[serde(rename = "Path-1")]
    Path1 = 0,
    /// Second candidate (ground link)
    #[serde(rename = "Path-2")]
    Path2 = 1,
    /// Third candidate (relay link)
    #[serde(rename = "Path-3")]
    Path3 = 2,
}

impl PathId {
    /// Number of candidate paths
    pub const COUNT: usize = 3;

    /// All paths in declaration order (also the tie-break order)
    pub const ALL: [PathId; Self::COUNT] = [Self::Path1, Self::Path2, Self::Path3];

    /// Table slot for this path
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Wire label
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Path1 => "Path-1",
            Self::Path2 => "Path-2",
            Self::Path3 => "Path-3",
        }
    }
}

impl Default for PathId {
    fn default() -> Self {
        Self::Path1
    }
}

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::UnknownPathId(s.to_string()))
    }
}

/// Fixed-size table with one slot per candidate path
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PathTable<T>([T; PathId::COUNT]);

impl<T> PathTable<T> {
    /// Build a table by evaluating `f` for every path in declaration order
    pub fn from_fn(f: impl FnMut(PathId) -> T) -> Self {
        Self(PathId::ALL.map(f))
    }

    /// Iterate `(path, value)` in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (PathId, &T)> {
        PathId::ALL.into_iter().zip(self.0.iter())
    }

    /// Map every slot into a new table
    pub fn map<U>(&self, mut f: impl FnMut(PathId, &T) -> U) -> PathTable<U> {
        PathTable::from_fn(|p| f(p, &self.0[p.index()]))
    }
}

impl<T> Index<PathId> for PathTable<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, path: PathId) -> &T {
        &self.0[path.index()]
    }
}

impl<T> IndexMut<PathId> for PathTable<T> {
    #[inline(always)]
    fn index_mut(&mut self, path: PathId) -> &mut T {
        &mut self.0[path.index()]
    }
}
