//! Package archive builder.
//!
//! Compresses one or more source folders into a single zip file. Entry names are
//! relative to the folder itself when the folder path is absolute, and relative to
//! the current working directory otherwise, so `jcr_root` becomes the entry
//! prefix `jcr_root/...` while `/srv/site` contributes its contents unprefixed.
//!
//! Every file below a folder is a candidate, dotfiles and symlinked files
//! included, minus the paths matched by the ignore patterns. Leading `..` and
//! `/` components never reach an entry name. The archive's own file name is
//! always ignored, so the output may live inside a source folder without
//! including itself.
//!
//! Zip walking and compression are blocking; [`build_archive`] runs them on the
//! blocking thread pool.

use crate::core::{CrexError, Result};
use crate::pattern::{IgnoreSet, to_slash};
use glob::Pattern;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// What to compress and where to write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSpec {
    /// Folders to include, in declaration order
    pub source_folders: Vec<String>,
    /// Glob patterns of paths to leave out
    pub ignore_patterns: Vec<String>,
    /// Archive file to create or overwrite
    pub output_path: PathBuf,
}

/// Result of a successful archive build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Path of the written archive
    pub path: PathBuf,
    /// Entry names in the order they were written
    pub entries: Vec<String>,
}

/// Build the archive described by `spec`.
///
/// # Errors
///
/// Returns [`CrexError::InvalidPattern`] for a malformed ignore pattern and
/// [`CrexError::Archive`] for any read or write failure. A failed build may
/// leave a partial file at `spec.output_path`; removing it is up to the caller.
pub async fn build_archive(spec: ArchiveSpec) -> Result<ArchiveSummary> {
    let cwd = std::env::current_dir()?;
    tokio::task::spawn_blocking(move || write_archive(&spec, &cwd))
        .await
        .map_err(|e| CrexError::Other {
            message: format!("archive task failed: {e}"),
        })?
}

/// Blocking archive writer with an explicit working directory.
pub fn write_archive(spec: &ArchiveSpec, cwd: &Path) -> Result<ArchiveSummary> {
    let output = &spec.output_path;
    let output_name = output
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| CrexError::archive(output.display(), "output path has no file name"))?;

    let mut ignore = IgnoreSet::new(&spec.ignore_patterns)?;
    ignore.add(&format!("**/{}", Pattern::escape(&output_name)))?;

    let file = File::create(output).map_err(|e| CrexError::archive(output.display(), e))?;
    let output_canonical = output.canonicalize().ok();
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = Vec::new();
    let mut seen = HashSet::new();

    for folder in &spec.source_folders {
        let folder_path = Path::new(folder);
        let base = if folder_path.is_absolute() {
            folder_path.to_path_buf()
        } else {
            cwd.to_path_buf()
        };
        let root = base.join(folder_path);

        if !root.is_dir() {
            warn!("Source folder {} does not exist, nothing to add", root.display());
            continue;
        }

        debug!("Adding {} (entries relative to {})", root.display(), base.display());

        for entry in WalkDir::new(&root).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.loop_ancestor().is_some() => {
                    warn!("Skipping symlink loop: {}", e);
                    continue;
                }
                Err(e) => return Err(CrexError::archive(output.display(), e)),
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Ok(relative) = path.strip_prefix(&base) else {
                continue;
            };

            let name = entry_name(relative);
            if name.is_empty()
                || is_output(path, relative, &output_name, output_canonical.as_deref())
                || ignore.is_ignored(Path::new(&name))
            {
                continue;
            }

            if !seen.insert(name.clone()) {
                warn!("Skipping duplicate archive entry {}", name);
                continue;
            }

            zip.start_file(name.as_str(), options)
                .map_err(|e| CrexError::archive(output.display(), e))?;
            let mut source =
                File::open(path).map_err(|e| CrexError::archive(output.display(), e))?;
            io::copy(&mut source, &mut zip).map_err(|e| CrexError::archive(output.display(), e))?;

            entries.push(name);
        }
    }

    zip.finish().map_err(|e| CrexError::archive(output.display(), e))?;
    info!("Wrote {} entries to {}", entries.len(), output.display());

    Ok(ArchiveSummary {
        path: output.clone(),
        entries,
    })
}

/// Zip entry name for a path relative to the walk base.
///
/// Only normal components are kept, so `../site/index.html` is stored as
/// `site/index.html` and no entry can point outside the extraction root.
fn entry_name(relative: &Path) -> String {
    let normal: PathBuf = relative
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();
    to_slash(&normal)
}

fn is_output(path: &Path, relative: &Path, output_name: &str, output: Option<&Path>) -> bool {
    if relative.file_name().is_some_and(|name| name == output_name) {
        return true;
    }
    output.is_some_and(|output| path.canonicalize().is_ok_and(|p| p == output))
}
