//! In-memory run report: the packaged output of one harness search.
//!
//! No file I/O in this module; see [`crate::report_dir`] for persistence.
//!
//! # Normative vs observational artifacts
//!
//! Each artifact is tagged `normative` (participates in the report digest)
//! or observational (listed in the manifest, excluded from the digest).
//! `timing.json` is observational because wall-clock time differs between
//! otherwise identical runs. Everything else is normative, so two runs of
//! the same problem under the same policy produce the same digest.
//!
//! The report digest is computed over the **digest basis**: a canonical JSON
//! projection of normative artifact names and hashes only.

use std::collections::BTreeMap;

use crate::canon::canonical_json_bytes;
use crate::hash::{canonical_hash, ContentHash, HashDomain};

/// Search outcome: status, path, path digest, error kind.
pub const OUTCOME_ARTIFACT: &str = "outcome.json";
/// Final counters.
pub const STATS_ARTIFACT: &str = "stats.json";
/// Policy echo.
pub const POLICY_ARTIFACT: &str = "policy.json";
/// Expansion audit trace.
pub const TRACE_ARTIFACT: &str = "search_trace.json";
/// World fixture, when the run came from a [`crate::contract::SearchWorld`].
pub const FIXTURE_ARTIFACT: &str = "fixture.json";
/// Wall-clock timing (observational).
pub const TIMING_ARTIFACT: &str = "timing.json";

/// Artifacts every report must carry.
pub const REQUIRED_ARTIFACTS: &[&str] = &[
    OUTCOME_ARTIFACT,
    POLICY_ARTIFACT,
    STATS_ARTIFACT,
    TRACE_ARTIFACT,
];

/// A single artifact in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    /// Logical filename (e.g. `"outcome.json"`).
    pub name: String,
    pub content: Vec<u8>,
    /// `canonical_hash(ReportArtifact, content)`.
    pub content_hash: ContentHash,
    /// Whether this artifact participates in the report digest.
    pub normative: bool,
}

/// The complete report from one run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Artifacts indexed by logical name, in sorted order.
    pub artifacts: BTreeMap<String, ReportArtifact>,
    /// Canonical JSON listing all artifacts with normative flags.
    pub manifest: Vec<u8>,
    /// Canonical JSON listing normative artifact hashes only.
    pub digest_basis: Vec<u8>,
    /// `canonical_hash(ReportDigest, digest_basis)`.
    pub digest: ContentHash,
}

impl RunReport {
    #[must_use]
    pub fn artifact(&self, name: &str) -> Option<&ReportArtifact> {
        self.artifacts.get(name)
    }

    /// Parse a JSON artifact by name.
    #[must_use]
    pub fn artifact_json(&self, name: &str) -> Option<serde_json::Value> {
        self.artifact(name)
            .and_then(|a| serde_json::from_slice(&a.content).ok())
    }

    /// The `status` field of `outcome.json` (`"found"` or `"failed"`).
    #[must_use]
    pub fn status(&self) -> Option<String> {
        self.artifact_json(OUTCOME_ARTIFACT)
            .and_then(|v| v.get("status").and_then(|s| s.as_str()).map(str::to_string))
    }
}

/// Error building a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportBuildError {
    /// Canonical JSON serialization failed.
    Canon { detail: String },
    /// Two inputs used the same artifact name.
    DuplicateArtifact { name: String },
}

impl std::fmt::Display for ReportBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Canon { detail } => write!(f, "canonical JSON error: {detail}"),
            Self::DuplicateArtifact { name } => write!(f, "duplicate artifact {name:?}"),
        }
    }
}

impl std::error::Error for ReportBuildError {}

/// Assemble a report from `(name, content, normative)` triples.
///
/// Computes content hashes, the sorted manifest, the digest basis and the
/// report digest.
///
/// # Errors
///
/// Returns [`ReportBuildError`] on a duplicate name or a canonicalization
/// failure.
pub fn build_report(
    artifacts: Vec<(String, Vec<u8>, bool)>,
) -> Result<RunReport, ReportBuildError> {
    let mut artifact_map = BTreeMap::new();
    for (name, content, normative) in artifacts {
        if artifact_map.contains_key(&name) {
            return Err(ReportBuildError::DuplicateArtifact { name });
        }
        let content_hash = canonical_hash(HashDomain::ReportArtifact, &content);
        artifact_map.insert(
            name.clone(),
            ReportArtifact {
                name,
                content,
                content_hash,
                normative,
            },
        );
    }

    let manifest =
        manifest_bytes(&artifact_map).map_err(|detail| ReportBuildError::Canon { detail })?;
    let digest_basis =
        digest_basis_bytes(&artifact_map).map_err(|detail| ReportBuildError::Canon { detail })?;
    let digest = canonical_hash(HashDomain::ReportDigest, &digest_basis);

    Ok(RunReport {
        artifacts: artifact_map,
        manifest,
        digest_basis,
        digest,
    })
}

/// Error from report integrity verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportVerifyError {
    ArtifactMissing { name: String },
    ContentHashMismatch {
        artifact: String,
        expected: String,
        actual: String,
    },
    ManifestMismatch,
    DigestBasisMismatch,
    DigestMismatch { expected: String, actual: String },
    ArtifactNotCanonical { artifact: String },
    /// A field in a normative artifact is absent or has the wrong type.
    FieldMissing { artifact: String, field: String },
    /// `stats.json` violates the per-child accounting identity.
    StatsUnbalanced,
    /// `outcome.json` declares a path digest that does not match its path.
    PathDigestMismatch { declared: String, recomputed: String },
    /// `outcome.json` declares a cost that does not match its path length.
    CostMismatch { declared: u64, path_len: u64 },
    Canon { detail: String },
}

impl std::fmt::Display for ReportVerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ArtifactMissing { name } => write!(f, "required artifact {name:?} missing"),
            Self::ContentHashMismatch {
                artifact,
                expected,
                actual,
            } => write!(
                f,
                "content hash mismatch for {artifact:?}: declared {expected}, recomputed {actual}"
            ),
            Self::ManifestMismatch => f.write_str("manifest does not match artifacts"),
            Self::DigestBasisMismatch => f.write_str("digest basis does not match artifacts"),
            Self::DigestMismatch { expected, actual } => {
                write!(f, "report digest mismatch: declared {expected}, recomputed {actual}")
            }
            Self::ArtifactNotCanonical { artifact } => {
                write!(f, "normative artifact {artifact:?} is not canonical JSON")
            }
            Self::FieldMissing { artifact, field } => {
                write!(f, "artifact {artifact:?} lacks field {field:?}")
            }
            Self::StatsUnbalanced => f.write_str("stats.json counters do not balance"),
            Self::PathDigestMismatch {
                declared,
                recomputed,
            } => write!(
                f,
                "path digest mismatch: declared {declared}, recomputed {recomputed}"
            ),
            Self::CostMismatch { declared, path_len } => write!(
                f,
                "declared cost {declared} does not match path of {path_len} states"
            ),
            Self::Canon { detail } => write!(f, "canonical JSON error: {detail}"),
        }
    }
}

impl std::error::Error for ReportVerifyError {}

/// Verify the internal consistency of a report.
///
/// This is a pure integrity check; it does not re-run the search. It proves:
///
/// 1. Every required artifact is present.
/// 2. Each artifact's `content_hash` matches its content.
/// 3. `manifest` and `digest_basis` match the projections recomputed from
///    the artifacts, and `digest` matches `digest_basis`.
/// 4. Normative JSON artifacts are in canonical form.
/// 5. `stats.json` balances.
/// 6. For a found outcome, `path_digest` and `cost` agree with `path`.
///
/// # Errors
///
/// Returns the first [`ReportVerifyError`] encountered.
pub fn verify_report(report: &RunReport) -> Result<(), ReportVerifyError> {
    for name in REQUIRED_ARTIFACTS {
        if !report.artifacts.contains_key(*name) {
            return Err(ReportVerifyError::ArtifactMissing {
                name: (*name).to_string(),
            });
        }
    }

    for artifact in report.artifacts.values() {
        let recomputed = canonical_hash(HashDomain::ReportArtifact, &artifact.content);
        if recomputed != artifact.content_hash {
            return Err(ReportVerifyError::ContentHashMismatch {
                artifact: artifact.name.clone(),
                expected: artifact.content_hash.to_string(),
                actual: recomputed.to_string(),
            });
        }
    }

    let expected_manifest =
        manifest_bytes(&report.artifacts).map_err(|detail| ReportVerifyError::Canon { detail })?;
    if expected_manifest != report.manifest {
        return Err(ReportVerifyError::ManifestMismatch);
    }

    let expected_basis = digest_basis_bytes(&report.artifacts)
        .map_err(|detail| ReportVerifyError::Canon { detail })?;
    if expected_basis != report.digest_basis {
        return Err(ReportVerifyError::DigestBasisMismatch);
    }

    let recomputed_digest = canonical_hash(HashDomain::ReportDigest, &report.digest_basis);
    if recomputed_digest != report.digest {
        return Err(ReportVerifyError::DigestMismatch {
            expected: report.digest.to_string(),
            actual: recomputed_digest.to_string(),
        });
    }

    for artifact in report.artifacts.values() {
        let is_json = std::path::Path::new(&artifact.name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if artifact.normative && is_json && !is_canonical_json(&artifact.content) {
            return Err(ReportVerifyError::ArtifactNotCanonical {
                artifact: artifact.name.clone(),
            });
        }
    }

    verify_stats(report)?;
    verify_outcome(report)
}

/// Digest of a solution path, as recorded in `outcome.json`.
///
/// # Errors
///
/// Returns the canonicalization error message if the path JSON contains a
/// non-integer number.
pub fn path_digest(path: &serde_json::Value) -> Result<ContentHash, String> {
    let bytes = canonical_json_bytes(path).map_err(|e| e.to_string())?;
    Ok(canonical_hash(HashDomain::SolutionPath, &bytes))
}

fn verify_stats(report: &RunReport) -> Result<(), ReportVerifyError> {
    let stats = parsed(report, STATS_ARTIFACT)?;
    let field = |name: &str| {
        stats
            .get(name)
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| ReportVerifyError::FieldMissing {
                artifact: STATS_ARTIFACT.into(),
                field: name.into(),
            })
    };
    let mut accounted = Some(field("distinct")?.saturating_sub(1));
    for name in ["reopened", "replaced", "discarded"] {
        let count = field(name)?;
        accounted = accounted.and_then(|sum| sum.checked_add(count));
    }
    // An overflowing sum cannot equal any recorded `generated`.
    if accounted == Some(field("generated")?) {
        Ok(())
    } else {
        Err(ReportVerifyError::StatsUnbalanced)
    }
}

fn verify_outcome(report: &RunReport) -> Result<(), ReportVerifyError> {
    let outcome = parsed(report, OUTCOME_ARTIFACT)?;
    let missing = |field: &str| ReportVerifyError::FieldMissing {
        artifact: OUTCOME_ARTIFACT.into(),
        field: field.into(),
    };
    let status = outcome
        .get("status")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| missing("status"))?;
    if status != "found" {
        return Ok(());
    }

    let path = outcome.get("path").ok_or_else(|| missing("path"))?;
    let path_len = path.as_array().ok_or_else(|| missing("path"))?.len() as u64;
    let declared_cost = outcome
        .get("cost")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| missing("cost"))?;
    if declared_cost.checked_add(1) != Some(path_len) {
        return Err(ReportVerifyError::CostMismatch {
            declared: declared_cost,
            path_len,
        });
    }

    let declared = outcome
        .get("path_digest")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| missing("path_digest"))?;
    let recomputed = path_digest(path).map_err(|detail| ReportVerifyError::Canon { detail })?;
    if recomputed.as_str() != declared {
        return Err(ReportVerifyError::PathDigestMismatch {
            declared: declared.to_string(),
            recomputed: recomputed.to_string(),
        });
    }
    Ok(())
}

fn parsed(report: &RunReport, name: &str) -> Result<serde_json::Value, ReportVerifyError> {
    report
        .artifact_json(name)
        .ok_or_else(|| ReportVerifyError::ArtifactNotCanonical {
            artifact: name.to_string(),
        })
}

fn manifest_bytes(artifacts: &BTreeMap<String, ReportArtifact>) -> Result<Vec<u8>, String> {
    let entries: Vec<serde_json::Value> = artifacts
        .values()
        .map(|a| {
            serde_json::json!({
                "content_hash": a.content_hash.as_str(),
                "name": a.name,
                "normative": a.normative,
            })
        })
        .collect();
    let value = serde_json::json!({
        "artifacts": entries,
        "schema_version": "run_report.v1",
    });
    canonical_json_bytes(&value).map_err(|e| e.to_string())
}

fn digest_basis_bytes(artifacts: &BTreeMap<String, ReportArtifact>) -> Result<Vec<u8>, String> {
    let entries: Vec<serde_json::Value> = artifacts
        .values()
        .filter(|a| a.normative)
        .map(|a| {
            serde_json::json!({
                "content_hash": a.content_hash.as_str(),
                "name": a.name,
            })
        })
        .collect();
    let value = serde_json::json!({
        "artifacts": entries,
        "schema_version": "run_report_digest_basis.v1",
    });
    canonical_json_bytes(&value).map_err(|e| e.to_string())
}

/// Parse, re-canonicalize, compare.
fn is_canonical_json(bytes: &[u8]) -> bool {
    serde_json::from_slice::<serde_json::Value>(bytes)
        .ok()
        .and_then(|v| canonical_json_bytes(&v).ok())
        .is_some_and(|recanon| recanon == bytes)
}
