use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, warn};
use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::error::ResolveError;

/// Extensions the file picker accepts as playable video
const SUPPORTED_EXTENSIONS: &[&str] = &[
    "mp4", "webm", "ogg", "m3u8", "mkv", "avi", "mov", "m4v", "flv", "wmv", "3gp", "ts",
];

/// Where the bytes of a selected file live
#[derive(Clone)]
pub enum FileSource {
    /// File contents already read into memory
    Bytes(Arc<[u8]>),
    /// File on disk, read lazily by whoever plays it
    Path(PathBuf),
}

impl fmt::Debug for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSource::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            FileSource::Path(path) => write!(f, "Path({})", path.display()),
        }
    }
}

/// A file picked by the user
#[derive(Debug, Clone)]
pub struct SelectedFile {
    /// Display name (file name without directories)
    pub name: String,
    /// File contents
    pub source: FileSource,
}

impl SelectedFile {
    /// Create a selection from in-memory bytes
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            source: FileSource::Bytes(bytes.into()),
        }
    }

    /// Create a selection referring to a file on disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Self {
            name,
            source: FileSource::Path(path.to_path_buf()),
        }
    }
}

/// Check if a file name has a playable video extension
pub fn is_supported_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Opaque, process-local reference to the bytes of a selected file.
///
/// Only valid until released through the registry that created it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    id: u64,
    url: String,
}

impl ResourceRef {
    fn new(id: u64) -> Self {
        Self {
            id,
            url: format!("blob:stream-core/{}", id),
        }
    }

    /// URL the player uses to address this resource
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Numeric identity within the issuing registry
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Capability for creating and releasing local resource references
pub trait ResourceRegistry: Send + Sync {
    /// Register the bytes of `file` and hand out a fresh reference
    fn create(&self, file: &SelectedFile) -> Result<ResourceRef, ResolveError>;

    /// Free the resource behind `handle`. Releasing an unknown handle is a no-op.
    fn release(&self, handle: &ResourceRef);

    /// Look up the bytes behind a live handle
    fn lookup(&self, handle: &ResourceRef) -> Option<FileSource>;
}

/// In-memory table of outstanding local resources
pub struct LocalResourceTable {
    next_id: AtomicU64,
    entries: Mutex<HashMap<u64, SelectedFile>>,
}

impl LocalResourceTable {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of handles created and not yet released
    pub fn outstanding(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if a handle is still live
    pub fn is_live(&self, handle: &ResourceRef) -> bool {
        self.entries.lock().contains_key(&handle.id)
    }
}

impl Default for LocalResourceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceRegistry for LocalResourceTable {
    fn create(&self, file: &SelectedFile) -> Result<ResourceRef, ResolveError> {
        if let FileSource::Bytes(bytes) = &file.source {
            if bytes.is_empty() {
                return Err(ResolveError::EmptyFile {
                    name: file.name.clone(),
                });
            }
        }

        let handle = ResourceRef::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut entries = self.entries.lock();
        entries.insert(handle.id, file.clone());
        debug!(
            "Created {} for {} ({} outstanding)",
            handle,
            file.name,
            entries.len()
        );

        Ok(handle)
    }

    fn release(&self, handle: &ResourceRef) {
        let mut entries = self.entries.lock();
        match entries.remove(&handle.id) {
            Some(file) => debug!(
                "Released {} for {} ({} outstanding)",
                handle,
                file.name,
                entries.len()
            ),
            None => warn!("Release of unknown handle {}", handle),
        }
    }

    fn lookup(&self, handle: &ResourceRef) -> Option<FileSource> {
        self.entries
            .lock()
            .get(&handle.id)
            .map(|file| file.source.clone())
    }
}

static GLOBAL_TABLE: Lazy<Arc<LocalResourceTable>> = Lazy::new(|| Arc::new(LocalResourceTable::new()));

/// Process-wide resource table shared by every resolver in this process
pub fn global_table() -> Arc<LocalResourceTable> {
    Arc::clone(&GLOBAL_TABLE)
}
