//! Glob ignore sets for archive building.
//!
//! Patterns follow the `glob` crate syntax and are matched against paths
//! relative to the archive base directory, using `/` as separator on every
//! platform:
//!
//! - `*` matches any sequence of characters
//! - `**` matches any number of path components
//! - `?` matches any single character
//! - `[abc]` / `[a-z]` match a character set or range
//!
//! Hidden files and directories are matched like any other path, so `*.tmp`
//! also matches `.cache.tmp`.

use crate::core::{CrexError, Result};
use glob::Pattern;
use std::path::Path;
use tracing::trace;

/// A compiled set of ignore patterns.
///
/// # Examples
///
/// ```rust
/// use crex_cli::pattern::IgnoreSet;
/// use std::path::Path;
///
/// # fn example() -> crex_cli::core::Result<()> {
/// let ignore = IgnoreSet::new(["**/*.tmp", "**/node_modules/**"])?;
///
/// assert!(ignore.is_ignored(Path::new("site/cache/b.tmp")));
/// assert!(!ignore.is_ignored(Path::new("site/index.html")));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    patterns: Vec<Pattern>,
}

impl IgnoreSet {
    /// Compile every pattern in `patterns`.
    ///
    /// # Errors
    ///
    /// Returns [`CrexError::InvalidPattern`] for the first pattern with invalid syntax.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for pattern in patterns {
            set.add(pattern.as_ref())?;
        }
        Ok(set)
    }

    /// Add one more pattern to the set.
    pub fn add(&mut self, pattern: &str) -> Result<()> {
        let compiled = Pattern::new(pattern).map_err(|e| CrexError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        self.patterns.push(compiled);
        Ok(())
    }

    /// Whether `relative_path` matches any pattern of the set.
    #[must_use]
    pub fn is_ignored(&self, relative_path: &Path) -> bool {
        let path = to_slash(relative_path);
        let ignored = self.patterns.iter().any(|pattern| pattern.matches(&path));
        if ignored {
            trace!("Ignoring {}", path);
        }
        ignored
    }

    /// Number of compiled patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the set has no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Render a relative path with `/` separators.
#[must_use]
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
