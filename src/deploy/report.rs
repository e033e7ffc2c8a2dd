//! Install change report.
//!
//! Turns a [`ChangeSet`] into the line sequence printed after an install. The
//! category order is fixed: removed, ignored, modified, added. Each category is
//! preceded by a blank line, lists its files, then ends with a count summary.

use crate::client::ChangeSet;
use std::fmt;

/// One of the four change categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCategory {
    /// Files removed by the install
    Removed,
    /// Files skipped by the remote system
    Ignored,
    /// Files whose content changed
    Modified,
    /// Files added by the install
    Added,
}

impl ChangeCategory {
    /// Output order of the report.
    pub const REPORT_ORDER: [Self; 4] = [Self::Removed, Self::Ignored, Self::Modified, Self::Added];

    /// Lowercase label used in file and summary lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Removed => "removed",
            Self::Ignored => "ignored",
            Self::Modified => "modified",
            Self::Added => "added",
        }
    }

    /// Marker printed in front of the summary line.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Removed => "✗",
            Self::Ignored => "○",
            Self::Modified => "⦿",
            Self::Added => "●",
        }
    }

    /// Files of this category in `changes`.
    #[must_use]
    pub fn files(self, changes: &ChangeSet) -> &[String] {
        match self {
            Self::Removed => &changes.removed_files,
            Self::Ignored => &changes.ignored_files,
            Self::Modified => &changes.modified_files,
            Self::Added => &changes.added_files,
        }
    }
}

/// A single line of the change report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine {
    /// Separator before each category
    Blank,
    /// One changed file
    File {
        /// Category of the change
        category: ChangeCategory,
        /// Path as returned by the remote system
        path: String,
    },
    /// Count line closing a category
    Summary {
        /// Category being summarised
        category: ChangeCategory,
        /// Number of files in the category
        count: usize,
    },
}

impl ReportLine {
    /// Category this line belongs to, `None` for blank lines.
    #[must_use]
    pub const fn category(&self) -> Option<ChangeCategory> {
        match self {
            Self::Blank => None,
            Self::File { category, .. } | Self::Summary { category, .. } => Some(*category),
        }
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => Ok(()),
            Self::File { category, path } => write!(f, "    {}:  {}", category.label(), path),
            Self::Summary { category, count } => {
                write!(f, "{}  {} {} files", category.symbol(), count, category.label())
            }
        }
    }
}

/// Build the report lines for `changes`.
#[must_use]
pub fn report_lines(changes: &ChangeSet) -> Vec<ReportLine> {
    let mut lines = Vec::with_capacity(changes.total() + 2 * ChangeCategory::REPORT_ORDER.len());

    for category in ChangeCategory::REPORT_ORDER {
        let files = category.files(changes);
        lines.push(ReportLine::Blank);
        lines.extend(files.iter().map(|path| ReportLine::File {
            category,
            path: path.clone(),
        }));
        lines.push(ReportLine::Summary {
            category,
            count: files.len(),
        });
    }

    lines
}
