//! Discovery of addon references from command line inputs.

use crate::bundler::ReferenceFilter;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expands `inputs` into addon ids.
///
/// Directories are walked recursively and contribute every regular file the
/// filter claims. Anything else is passed through as given, so a missing
/// file still reaches the rewriter and is reported there.
pub fn collect_references(inputs: &[PathBuf], filter: &ReferenceFilter) -> Vec<String> {
    let mut ids = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut found = scan_dir(input, filter);
            log::debug!("Found {} addon(s) under {}", found.len(), input.display());
            found.sort();
            ids.extend(found);
        } else {
            let id = input.to_string_lossy().into_owned();
            if filter.matches(&id) {
                ids.push(id);
            } else {
                log::warn!("Skipping {}: not matched by include patterns", input.display());
            }
        }
    }

    ids
}

fn scan_dir(dir: &Path, filter: &ReferenceFilter) -> Vec<String> {
    WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_string_lossy().into_owned())
        .filter(|id| filter.matches(id))
        .collect()
}
