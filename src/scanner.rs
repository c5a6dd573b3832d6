use crate::{Document, RenameError, Result};
use std::path::Path;
use tracing::{debug, warn};

/// One read of the batch directory.
#[derive(Debug, Clone, Default)]
pub struct DirectoryListing {
    /// Every entry name in the directory, files or not, sorted.
    pub entries: Vec<String>,

    /// Regular files carrying the batch prefix, in lexicographic order.
    /// Symbolic links count when they point at a regular file.
    pub documents: Vec<Document>,

    /// Prefixed entries that are not regular files (directories, dangling
    /// links), sorted.
    pub skipped: Vec<String>,
}

/// List `directory` and collect the documents whose name starts with `prefix`.
///
/// Only the top level is read. Failing to open or iterate the directory is a
/// [`RenameError::DirectoryRead`]; individual entries that cannot be inspected
/// or whose names are not valid UTF-8 are skipped with a warning. Prefixed
/// entries that do not resolve to a regular file land in
/// [`DirectoryListing::skipped`].
pub fn scan_directory<P: AsRef<Path>>(directory: P, prefix: &str) -> Result<DirectoryListing> {
    let directory = directory.as_ref();
    let read_error = |source| RenameError::DirectoryRead {
        path: directory.to_path_buf(),
        source,
    };

    let mut listing = DirectoryListing::default();

    for entry in std::fs::read_dir(directory).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;

        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                warn!("skipping entry with non UTF-8 name: {:?}", raw);
                continue;
            }
        };

        if name.starts_with(prefix) {
            // fs::metadata follows symlinks, DirEntry::file_type does not.
            match std::fs::metadata(entry.path()) {
                Ok(meta) if meta.is_file() => listing.documents.push(Document::new(directory, &name)),
                Ok(_) => {
                    debug!("'{}' is not a regular file", name);
                    listing.skipped.push(name.clone());
                }
                Err(e) => {
                    warn!("'{}' cannot be inspected: {}", name, e);
                    listing.skipped.push(name.clone());
                }
            }
        }

        listing.entries.push(name);
    }

    listing.entries.sort();
    listing.documents.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    listing.skipped.sort();

    debug!(
        "scanned {}: {} entries, {} documents",
        directory.display(),
        listing.entries.len(),
        listing.documents.len()
    );

    Ok(listing)
}
