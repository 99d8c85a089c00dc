use std::fmt;
use std::path::{Path, PathBuf};

/// Identity of one analyzed text.
///
/// A buffer submitted over the wire and the on-disk file at the same path
/// are distinct identities, each with its own snapshot and tree. A
/// submission under either identity invalidates the whole path, so the
/// two never serve stale views of one file side by side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceId {
    Buffer(PathBuf),
    Disk(PathBuf),
}

impl SourceId {
    pub fn path(&self) -> &Path {
        match self {
            Self::Buffer(path) | Self::Disk(path) => path,
        }
    }

    pub fn is_buffer(&self) -> bool {
        matches!(self, Self::Buffer(_))
    }
}

impl fmt::Display for SourceId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Buffer(path) => write!(f, "buffer:{}", path.display()),
            Self::Disk(path) => write!(f, "disk:{}", path.display()),
        }
    }
}
