//! Filesystem layer abstraction
//!
//! Provides the mount/open/read/close/unmount contract used by the
//! storage watcher. The on-disk format is entirely the implementation's
//! business.

/// File open mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OpenMode {
    /// Open an existing file for reading only
    ReadOnly,
}

/// Errors from filesystem operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FsError {
    /// No medium, or the medium did not answer
    NotReady,
    /// Volume is not mounted
    NotMounted,
    /// No recognizable filesystem on the volume
    NoFilesystem,
    /// Volume identifier is not valid for this layer
    InvalidVolume,
    /// File or path does not exist
    NotFound,
    /// Name cannot be represented on this filesystem
    InvalidName,
    /// Access denied (read-only medium, file locked)
    Denied,
    /// Too many open handles
    TooManyOpen,
    /// Low-level block device error
    Disk,
}

impl FsError {
    /// Short human-readable description
    pub fn as_str(self) -> &'static str {
        match self {
            FsError::NotReady => "not ready",
            FsError::NotMounted => "not mounted",
            FsError::NoFilesystem => "no filesystem",
            FsError::InvalidVolume => "invalid volume",
            FsError::NotFound => "not found",
            FsError::InvalidName => "invalid name",
            FsError::Denied => "denied",
            FsError::TooManyOpen => "too many open",
            FsError::Disk => "disk error",
        }
    }
}

/// Filesystem layer
///
/// Every call may block for the duration of the underlying bus traffic.
/// Implementations must make `unmount` idempotent: unmounting a volume
/// that is not mounted succeeds and does nothing.
pub trait Filesystem {
    /// Open file handle
    type File;

    /// Mount the volume identified by `volume` (for example `"0:/"`)
    fn mount(&mut self, volume: &str) -> Result<(), FsError>;

    /// Open the file at `path` on the mounted volume
    fn open(&mut self, path: &str, mode: OpenMode) -> Result<Self::File, FsError>;

    /// Read up to `buf.len()` bytes from the file's current position
    ///
    /// Returns the number of bytes read; `0` means end of file.
    fn read(&mut self, file: &mut Self::File, buf: &mut [u8]) -> Result<usize, FsError>;

    /// Close a file handle
    fn close(&mut self, file: Self::File) -> Result<(), FsError>;

    /// Unmount the volume
    fn unmount(&mut self, volume: &str) -> Result<(), FsError>;
}
