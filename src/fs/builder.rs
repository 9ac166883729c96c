//! Builds a [`NoteTree`] from a directory, keeping only note documents.
//!
//! The walk never fails loudly: a subdirectory that cannot be listed is left
//! out of the tree, and a root that is not a directory yields `None`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs::node::{NodeId, NodeKind, NoteTree};

/// Document extensions shown in the tree (compared case-insensitively).
pub const ACCEPTED_EXTENSIONS: &[&str] = &["md", "txt", "markdown"];

/// Directory-listing capability consumed by the builder.
///
/// Listing may fail (permission denied, I/O fault); the builder treats any
/// failure as "skip this directory".
pub trait DirectoryLister {
    fn is_directory(&self, path: &Path) -> bool;
    fn list_subdirectories(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
    fn list_files(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Identity of a directory for cycle detection. Two paths reaching the
    /// same directory through links must map to the same value.
    fn canonical_path(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }
}

/// [`DirectoryLister`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    fn list_entries(path: &Path, want_dirs: bool) -> io::Result<Vec<PathBuf>> {
        let mut out = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            // Follows symlinks, so a link to a directory is listed as one.
            let entry_path = entry.path();
            let is_dir = entry_path.is_dir();
            if is_dir && Self::links_to_ancestor(path, &entry) {
                tracing::debug!(path = %entry_path.display(), "skipping symlink cycle");
                continue;
            }
            if is_dir == want_dirs && (is_dir || entry_path.is_file()) {
                out.push(entry_path);
            }
        }
        Ok(out)
    }

    /// A symlinked directory pointing at `dir` or one of its ancestors.
    fn links_to_ancestor(dir: &Path, entry: &fs::DirEntry) -> bool {
        let is_link = entry.file_type().map(|t| t.is_symlink()).unwrap_or(false);
        if !is_link {
            return false;
        }
        match (fs::canonicalize(entry.path()), fs::canonicalize(dir)) {
            (Ok(target), Ok(dir)) => dir.starts_with(target),
            _ => true,
        }
    }
}

impl DirectoryLister for LocalFs {
    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_subdirectories(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        Self::list_entries(path, true)
    }

    fn list_files(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        Self::list_entries(path, false)
    }

    fn canonical_path(&self, path: &Path) -> PathBuf {
        fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }
}

/// Whether `path` carries one of the [`ACCEPTED_EXTENSIONS`].
pub fn is_accepted_document(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Build the note tree rooted at `root` from the local filesystem.
pub fn build(root: &Path) -> Option<NoteTree> {
    build_with(&LocalFs, root)
}

/// Build the note tree rooted at `root` using the given lister.
pub fn build_with<L: DirectoryLister>(lister: &L, root: &Path) -> Option<NoteTree> {
    if !lister.is_directory(root) {
        tracing::info!(root = %root.display(), "notes root is not a directory");
        return None;
    }

    let mut tree = NoteTree::new(root);
    let root_id = tree.root();

    // A root that exists but cannot be listed shows up empty.
    match read_listing(lister, root) {
        Some(listing) => {
            let mut chain = vec![lister.canonical_path(root)];
            if let Err(e) = populate(lister, &mut tree, root_id, listing, &mut chain) {
                tracing::warn!(error = %e, "tree build stopped early");
            }
        }
        None => tracing::warn!(root = %root.display(), "notes root could not be listed"),
    }

    tracing::info!(root = %root.display(), nodes = tree.len(), "built note tree");
    Some(tree)
}

/// Run [`build`] on tokio's blocking pool and await the snapshot.
pub async fn build_in_background(root: PathBuf) -> Option<NoteTree> {
    match tokio::task::spawn_blocking(move || build(&root)).await {
        Ok(tree) => tree,
        Err(e) => {
            tracing::warn!(error = %e, "tree build task failed");
            None
        }
    }
}

/// Immediate, already sorted contents of one directory.
struct Listing {
    subdirs: Vec<PathBuf>,
    files: Vec<PathBuf>,
}

fn read_listing<L: DirectoryLister>(lister: &L, dir: &Path) -> Option<Listing> {
    let subdirs = match lister.list_subdirectories(dir) {
        Ok(d) => d,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "skipping unlistable directory");
            return None;
        }
    };
    let files = match lister.list_files(dir) {
        Ok(f) => f,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "skipping unlistable directory");
            return None;
        }
    };

    let mut subdirs = subdirs;
    sort_by_name(&mut subdirs);
    let mut files: Vec<PathBuf> = files
        .into_iter()
        .filter(|f| is_accepted_document(f))
        .collect();
    sort_by_name(&mut files);

    Some(Listing { subdirs, files })
}

/// Attach `listing` under `parent`: folders first, then documents.
///
/// `chain` holds the canonical directories from the root down to `parent`.
/// A subdirectory already on it is a link cycle and is not descended into.
fn populate<L: DirectoryLister>(
    lister: &L,
    tree: &mut NoteTree,
    parent: NodeId,
    listing: Listing,
    chain: &mut Vec<PathBuf>,
) -> Result<()> {
    for dir in listing.subdirs {
        let canonical = lister.canonical_path(&dir);
        if chain.contains(&canonical) {
            tracing::debug!(path = %dir.display(), "skipping symlink cycle");
            continue;
        }
        // Listed before attaching so an unreadable folder never appears.
        let Some(child_listing) = read_listing(lister, &dir) else {
            continue;
        };
        let child = tree.attach_child(parent, dir, NodeKind::Folder)?;
        chain.push(canonical);
        let populated = populate(lister, tree, child, child_listing, chain);
        chain.pop();
        populated?;
    }
    for file in listing.files {
        tree.attach_child(parent, file, NodeKind::Document)?;
    }
    Ok(())
}

fn sort_by_name(paths: &mut [PathBuf]) {
    paths.sort_by_cached_key(|p| {
        p.file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    });
}
