//! Directory resolution abstraction.
//!
//! The source checkout lives in a deterministic location under the invoking
//! user's home directory. Resolution goes through a trait so tests never
//! depend on the real home directory.

use camino::Utf8PathBuf;

/// Provides the base directories the toolbox anchors its paths to.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// Returns the invoking user's home directory, when it can be
    /// determined and is valid UTF-8.
    fn home_dir(&self) -> Option<Utf8PathBuf>;
}

/// Resolves directories from the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBaseDirs;

impl BaseDirs for SystemBaseDirs {
    fn home_dir(&self) -> Option<Utf8PathBuf> {
        directories_next::BaseDirs::new()
            .and_then(|dirs| Utf8PathBuf::from_path_buf(dirs.home_dir().to_path_buf()).ok())
    }
}
