use std::fmt;

/// The path an entry will have inside the RAM filesystem.
///
/// The root is the empty string and every level below it appends `/name`, so the first level
/// of the tree looks like `/name` and deeper levels like `/dir/name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VirtualPath(String);
impl VirtualPath {
    pub fn root() -> Self {
        Self(String::new())
    }
    pub fn join(&self, name: &str) -> Self {
        Self(format!("{}/{}", self.0, name))
    }
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    /// Length in bytes, which is what the target filesystem API expects next to the string.
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// The last path segment, or `None` for the root.
    pub fn file_name(&self) -> Option<&str> {
        self.0.rsplit_once('/').map(|(_, name)| name)
    }
    /// The enclosing directory, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        self.0
            .rsplit_once('/')
            .map(|(parent, _)| Self(parent.to_string()))
    }
}
impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The contents of one regular file, embedded in the generated source as a byte array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// Sequential number, assigned in the order files are discovered.
    pub index: usize,
    pub content: Vec<u8>,
}
impl Blob {
    /// The C identifier of the byte array, e.g. `filerom_3`.
    pub fn name(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File(Blob),
}

/// A directory or file staged for creation inside the RAM filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualEntry {
    pub path: VirtualPath,
    pub kind: EntryKind,
}
impl VirtualEntry {
    pub fn is_file(&self) -> bool {
        matches!(self.kind, EntryKind::File(_))
    }
    pub fn blob(&self) -> Option<&Blob> {
        match &self.kind {
            EntryKind::File(blob) => Some(blob),
            EntryKind::Directory => None,
        }
    }
}

/// Every directory and file discovered under the input root, in discovery (pre-)order.
///
/// Because a directory is pushed before anything below it, replaying all directories first
/// and then all files never touches a path whose parent does not exist yet.
#[derive(Debug, Clone, Default)]
pub struct VirtualFS {
    pub entries: Vec<VirtualEntry>,
    next_blob: usize,
}
impl VirtualFS {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn push_directory(&mut self, path: VirtualPath) {
        self.entries.push(VirtualEntry {
            path,
            kind: EntryKind::Directory,
        });
    }
    /// Stages a regular file and returns the index of the blob allocated for it.
    pub fn push_file(&mut self, path: VirtualPath, content: Vec<u8>) -> usize {
        let index = self.next_blob;
        self.next_blob += 1;

        self.entries.push(VirtualEntry {
            path,
            kind: EntryKind::File(Blob { index, content }),
        });

        index
    }
    pub fn directories(&self) -> impl Iterator<Item = &VirtualEntry> {
        self.entries.iter().filter(|entry| !entry.is_file())
    }
    pub fn files(&self) -> impl Iterator<Item = &VirtualEntry> {
        self.entries.iter().filter(|entry| entry.is_file())
    }
    pub fn blob_count(&self) -> usize {
        self.next_blob
    }
}
