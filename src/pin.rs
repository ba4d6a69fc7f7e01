//! The pinned commit and its derived synthetic package version.
//!
//! The tool is always built from one exact upstream commit rather than a
//! release tag, so the package carries a manufactured version of the form
//! `0.0.0-g<short-hash>`. The `g` prefix marks a git-derived prerelease and
//! keeps the string inside NuGet's SemVer2 grammar.

use crate::error::{Result, ToolboxError};
use std::fmt;
use std::str::FromStr;

/// Length of a full commit hash in hexadecimal characters.
pub const FULL_HASH_LEN: usize = 40;

/// Length of the abbreviated hash used in the synthetic version.
pub const SHORT_HASH_LEN: usize = 10;

/// A validated, full-length commit hash pinning the tool's source state.
///
/// Construction rejects anything that is not exactly forty hexadecimal
/// characters; the stored form is lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PinnedCommit(String);

impl PinnedCommit {
    /// Validates and normalises a full commit hash.
    ///
    /// # Errors
    ///
    /// Returns [`ToolboxError::InvalidCommit`] when the hash is not forty
    /// hexadecimal characters.
    pub fn new(hash: impl Into<String>) -> Result<Self> {
        let hash = hash.into();

        if hash.len() != FULL_HASH_LEN {
            return Err(ToolboxError::InvalidCommit {
                commit: hash,
                reason: "expected exactly 40 characters",
            });
        }

        if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ToolboxError::InvalidCommit {
                commit: hash,
                reason: "expected only hexadecimal characters",
            });
        }

        Ok(Self(hash.to_ascii_lowercase()))
    }

    /// Returns the full lowercase hash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the first ten characters of the hash.
    #[must_use]
    pub fn short(&self) -> &str {
        // Safe to slice: construction guarantees 40 ASCII characters.
        &self.0[..SHORT_HASH_LEN]
    }

    /// Returns the synthetic package version, `0.0.0-g<short-hash>`.
    #[must_use]
    pub fn package_version(&self) -> String {
        format!("0.0.0-g{}", self.short())
    }
}

impl fmt::Display for PinnedCommit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PinnedCommit {
    type Err = ToolboxError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::upstream_pin(
        "ce87e84a58dff318f62ffe5177bf3e179d815108",
        "ce87e84a58",
        "0.0.0-gce87e84a58"
    )]
    #[case::other_hash(
        "0123456789abcdef0123456789abcdef01234567",
        "0123456789",
        "0.0.0-g0123456789"
    )]
    fn derives_short_hash_and_synthetic_version(
        #[case] full: &str,
        #[case] short: &str,
        #[case] version: &str,
    ) {
        let commit = PinnedCommit::new(full).expect("expected a valid hash");
        assert_eq!(commit.short(), short);
        assert_eq!(commit.package_version(), version);
    }

    #[test]
    fn normalises_to_lowercase() {
        let commit = PinnedCommit::new("CE87E84A58DFF318F62FFE5177BF3E179D815108")
            .expect("expected a valid hash");
        assert_eq!(commit.as_str(), "ce87e84a58dff318f62ffe5177bf3e179d815108");
        assert_eq!(commit.package_version(), "0.0.0-gce87e84a58");
    }

    #[rstest]
    #[case::too_short("ce87e84a58")]
    #[case::too_long("ce87e84a58dff318f62ffe5177bf3e179d815108ab")]
    #[case::not_hex("zz87e84a58dff318f62ffe5177bf3e179d815108")]
    #[case::empty("")]
    fn rejects_malformed_hashes(#[case] hash: &str) {
        let err = PinnedCommit::new(hash).expect_err("expected rejection");
        assert!(matches!(err, ToolboxError::InvalidCommit { .. }));
    }

    #[test]
    fn parses_from_str() {
        let commit: PinnedCommit = "ce87e84a58dff318f62ffe5177bf3e179d815108"
            .parse()
            .expect("expected a valid hash");
        assert_eq!(commit.short(), "ce87e84a58");
    }
}
