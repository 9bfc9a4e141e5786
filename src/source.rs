use crate::{
    config::{Config, ConfigError},
    errors::{FileOperation, IoError},
    vfs::{VirtualFS, VirtualPath},
};
use miette::Diagnostic;
use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug, Diagnostic)]
pub enum SourceError {
    #[error("I/O error within source domain")]
    #[diagnostic(code(ramfs_gen::source::io))]
    Io(#[from] IoError),

    #[error("input path '{path}' is not a directory")]
    #[diagnostic(
        code(ramfs_gen::source::not_a_directory),
        help("The first argument must be the directory whose contents go into the image")
    )]
    NotADirectory { path: PathBuf },

    #[error("file name under '{path}' is not valid UTF-8")]
    #[diagnostic(
        code(ramfs_gen::source::non_unicode_name),
        help("Virtual paths are embedded as C strings and must be UTF-8; rename the entry")
    )]
    NonUnicodeName { path: PathBuf },

    #[error("unable to strip prefix from directory")]
    #[diagnostic(code(ramfs_gen::source::strip_prefix))]
    StripPrefix {
        path: PathBuf,
        dir: PathBuf,
        source: std::path::StripPrefixError,
    },
}

/// How the host tree is walked.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub sort: bool,
    pub exclude: Vec<Regex>,
}
impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            sort: true,
            exclude: Vec::new(),
        }
    }
}
impl ScanOptions {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            sort: config.sort,
            exclude: config.exclude_patterns()?,
        })
    }
    fn is_excluded(&self, path: &VirtualPath) -> bool {
        self.exclude
            .iter()
            .any(|pattern| pattern.is_match(path.as_str()))
    }
}

/// Maps a host path below `root` onto its virtual path, e.g. `<root>/sub/b.bin` to `/sub/b.bin`.
fn virtual_path(root: &Path, path: &Path) -> Result<VirtualPath, SourceError> {
    let relative = path
        .strip_prefix(root)
        .map_err(|error| SourceError::StripPrefix {
            path: path.to_path_buf(),
            dir: root.to_path_buf(),
            source: error,
        })?;

    relative
        .components()
        .try_fold(VirtualPath::root(), |parent, component| {
            let name = component
                .as_os_str()
                .to_str()
                .ok_or_else(|| SourceError::NonUnicodeName {
                    path: path.parent().unwrap_or(root).to_path_buf(),
                })?;

            Ok(parent.join(name))
        })
}

fn keep_entry(root: &Path, entry: &DirEntry, options: &ScanOptions) -> bool {
    // naming problems are reported by the main loop, not swallowed here
    match virtual_path(root, entry.path()) {
        Ok(path) if options.is_excluded(&path) => {
            log::debug!("excluding {}", path);
            false
        }
        _ => true,
    }
}

/// Walks `root` depth-first and stages every directory and regular file below it.
///
/// A directory is staged as soon as it is found, before anything inside it, and blobs are
/// numbered in the same pre-order. The root itself is not staged.
pub fn scan(root: &Path, options: &ScanOptions) -> Result<VirtualFS, SourceError> {
    let metadata = fs::metadata(root)
        .map_err(|error| IoError::new(FileOperation::Walk, root.to_path_buf(), error))?;

    if !metadata.is_dir() {
        return Err(SourceError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    // links stage as their targets; a dangling link surfaces as a walk error
    let mut walker = WalkDir::new(root).min_depth(1).follow_links(true);
    if options.sort {
        walker = walker.sort_by_file_name();
    }

    let mut vfs = VirtualFS::new();

    for entry in walker
        .into_iter()
        .filter_entry(|entry| keep_entry(root, entry, options))
    {
        let entry = match entry {
            Ok(e) => e,
            Err(error) => {
                let path = error.path().unwrap_or(root).to_path_buf();

                Err(IoError::new(FileOperation::Walk, path, error.into()))?
            }
        };

        let full_path = entry.path();
        let path = virtual_path(root, full_path)?;

        if entry.file_type().is_dir() {
            log::debug!("directory {}", path);

            vfs.push_directory(path);
        } else {
            let content = fs::read(full_path)
                .map_err(|error| IoError::new(FileOperation::Read, full_path.to_path_buf(), error))?;

            let size = content.len();
            let index = vfs.push_file(path.clone(), content);

            log::debug!("file {} ({} bytes) -> blob {}", path, size, index);
        }
    }

    Ok(vfs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::EntryKind;

    fn sample_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"hi").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("b.bin"), b"").unwrap();
        fs::create_dir(dir.path().join("sub").join("empty")).unwrap();
        fs::write(dir.path().join("z.txt"), b"zzz").unwrap();
        dir
    }

    fn paths(vfs: &VirtualFS) -> Vec<&str> {
        vfs.entries.iter().map(|entry| entry.path.as_str()).collect()
    }

    #[test]
    fn test_scan_is_preorder_and_sorted() {
        let dir = sample_tree();
        let vfs = scan(dir.path(), &ScanOptions::default()).unwrap();

        assert_eq!(
            paths(&vfs),
            vec!["/a.txt", "/sub", "/sub/b.bin", "/sub/empty", "/z.txt"]
        );
        assert_eq!(
            vfs.entries[0].kind,
            EntryKind::File(crate::vfs::Blob {
                index: 0,
                content: b"hi".to_vec()
            })
        );
        assert_eq!(vfs.entries[2].blob().map(|blob| blob.index), Some(1));
        assert_eq!(vfs.entries[4].blob().map(|blob| blob.index), Some(2));
        assert_eq!(vfs.blob_count(), 3);
    }

    #[test]
    fn test_scan_unsorted_finds_the_same_entries() {
        let dir = sample_tree();
        let options = ScanOptions {
            sort: false,
            ..ScanOptions::default()
        };
        let vfs = scan(dir.path(), &options).unwrap();
        let order = paths(&vfs);

        let mut found = order.clone();
        found.sort();
        assert_eq!(
            found,
            vec!["/a.txt", "/sub", "/sub/b.bin", "/sub/empty", "/z.txt"]
        );

        // a directory still precedes its contents
        let position = |wanted: &str| order.iter().position(|path| *path == wanted).unwrap();
        assert!(position("/sub") < position("/sub/b.bin"));
        assert!(position("/sub") < position("/sub/empty"));
    }

    #[test]
    fn test_excluded_directory_drops_its_subtree() {
        let dir = sample_tree();
        let options = ScanOptions {
            exclude: vec![Regex::new(r"^/sub$").unwrap(), Regex::new(r"\.txt$").unwrap()],
            ..ScanOptions::default()
        };
        let vfs = scan(dir.path(), &options).unwrap();

        assert!(vfs.entries.is_empty());
        assert_eq!(vfs.blob_count(), 0);
    }

    #[test]
    fn test_empty_root_gives_empty_image() {
        let dir = tempfile::tempdir().unwrap();
        let vfs = scan(dir.path(), &ScanOptions::default()).unwrap();

        assert!(vfs.entries.is_empty());
    }

    #[test]
    fn test_root_must_be_a_directory() {
        let dir = sample_tree();

        assert!(matches!(
            scan(&dir.path().join("a.txt"), &ScanOptions::default()),
            Err(SourceError::NotADirectory { .. })
        ));
        assert!(matches!(
            scan(&dir.path().join("missing"), &ScanOptions::default()),
            Err(SourceError::Io(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_name_is_rejected() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let dir = tempfile::tempdir().unwrap();
        let name = OsStr::from_bytes(b"bad\xffname");
        if fs::write(dir.path().join(name), b"x").is_err() {
            // some filesystems refuse such names outright
            return;
        }

        assert!(matches!(
            scan(dir.path(), &ScanOptions::default()),
            Err(SourceError::NonUnicodeName { .. })
        ));
    }
}
