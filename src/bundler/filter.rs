//! Reference identification.
//!
//! Decides whether a module id names a native addon this bundler handles.

use crate::bundler::error::Result;
use regex::RegexSet;

/// Default include pattern: any id ending in `.node`.
pub const DEFAULT_INCLUDE: &str = r"\.node$";

/// Include/exclude matcher over reference ids.
#[derive(Debug, Clone)]
pub struct ReferenceFilter {
    include: RegexSet,
    exclude: RegexSet,
}

impl ReferenceFilter {
    /// Compiles the include and exclude pattern lists.
    ///
    /// An empty include list falls back to [`DEFAULT_INCLUDE`].
    pub fn new<I, E>(include: I, exclude: E) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let include: Vec<String> = include.into_iter().map(|p| p.as_ref().to_string()).collect();
        let include = if include.is_empty() {
            RegexSet::new([DEFAULT_INCLUDE])?
        } else {
            RegexSet::new(&include)?
        };
        let exclude = RegexSet::new(exclude)?;
        Ok(Self { include, exclude })
    }

    /// Returns true if `id` is claimed.
    ///
    /// Query suffixes are ignored, so `foo.node?v=1` is matched as `foo.node`.
    pub fn matches(&self, id: &str) -> bool {
        let id = strip_query(id);
        self.include.is_match(id) && !self.exclude.is_match(id)
    }
}

impl Default for ReferenceFilter {
    fn default() -> Self {
        Self {
            include: RegexSet::new([DEFAULT_INCLUDE]).unwrap_or_else(|_| RegexSet::empty()),
            exclude: RegexSet::empty(),
        }
    }
}

/// Drops a `?query` suffix from a module id.
pub fn strip_query(id: &str) -> &str {
    id.split_once('?').map_or(id, |(path, _)| path)
}
