//! Domain-separated content hashing.
//!
//! Algorithm: SHA-256 over `domain_prefix || data`, rendered as
//! `"sha256:<hex>"`. Every hash in a run report picks a [`HashDomain`] so
//! that equal bytes in different roles never collide.

use sha2::{Digest, Sha256};

/// A `"<algorithm>:<digest>"` string, as stored in manifests and outcomes.
///
/// Holds exactly one `:` with text on both sides; [`ContentHash::parse`]
/// refuses anything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash {
    full: String,
    split: usize,
}

impl ContentHash {
    /// Accept `"sha256:ab12..."`-shaped text.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let (algorithm, digest) = s.split_once(':')?;
        if algorithm.is_empty() || digest.is_empty() || digest.contains(':') {
            return None;
        }
        Some(Self {
            full: s.to_owned(),
            split: algorithm.len(),
        })
    }

    /// Text before the separator, e.g. `"sha256"`.
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.full[..self.split]
    }

    /// Lowercase hex after the separator.
    #[must_use]
    pub fn hex_digest(&self) -> &str {
        &self.full[self.split + 1..]
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full)
    }
}

/// Typed domain separator for [`canonical_hash`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashDomain {
    /// A single report artifact's content.
    ReportArtifact,
    /// The digest basis of a whole run report.
    ReportDigest,
    /// A solution path (used by fixtures to compare paths across processes).
    SolutionPath,
}

impl HashDomain {
    /// All domains in declaration order.
    pub const ALL: &'static [HashDomain] = &[
        Self::ReportArtifact,
        Self::ReportDigest,
        Self::SolutionPath,
    ];

    /// The raw null-terminated prefix bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::ReportArtifact => b"WAYPOINT::REPORT_ARTIFACT::V1\0",
            Self::ReportDigest => b"WAYPOINT::REPORT_DIGEST::V1\0",
            Self::SolutionPath => b"WAYPOINT::SOLUTION_PATH::V1\0",
        }
    }
}

/// Compute `sha256(domain || data)`.
#[must_use]
pub fn canonical_hash(domain: HashDomain, data: &[u8]) -> ContentHash {
    let digest = Sha256::new()
        .chain_update(domain.as_bytes())
        .chain_update(data)
        .finalize();
    ContentHash {
        full: format!("sha256:{}", hex::encode(digest)),
        split: "sha256".len(),
    }
}
