//! Report directory persistence: write, read and verify a [`RunReport`] on disk.
//!
//! ```text
//! <dir>/
//!   report_manifest.json      canonical JSON, every artifact with its flag
//!   report_digest_basis.json  canonical JSON, normative projection only
//!   report_digest.txt         "sha256:..."
//!   outcome.json  stats.json  policy.json  search_trace.json  ...
//! ```
//!
//! The manifest is the source of truth for what belongs in the directory.
//! Reading is fail-closed: a missing declared file, an undeclared extra file,
//! or a stored digest that disagrees with the digest basis is an error.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::hash::{canonical_hash, ContentHash, HashDomain};
use crate::report::{verify_report, ReportArtifact, ReportVerifyError, RunReport};

const MANIFEST_FILE: &str = "report_manifest.json";
const DIGEST_BASIS_FILE: &str = "report_digest_basis.json";
const DIGEST_FILE: &str = "report_digest.txt";
const MANIFEST_SCHEMA: &str = "run_report.v1";
const TEMP_PREFIX: &str = ".partial_";

/// Failure writing, reading or verifying a report directory.
#[derive(Debug)]
pub enum ReportDirError {
    Io { detail: String },
    MissingMetadata { file: String },
    MissingArtifact { name: String },
    ExtraFile { name: String },
    /// An artifact name is not a plain file name.
    UnsafeArtifactName { name: String },
    ManifestInvalid { detail: String },
    DigestMismatch { stored: String, recomputed: String },
    /// The report read back but failed integrity verification.
    Verify(ReportVerifyError),
}

impl std::fmt::Display for ReportDirError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
            Self::MissingMetadata { file } => write!(f, "missing metadata file {file}"),
            Self::MissingArtifact { name } => write!(f, "missing declared artifact {name}"),
            Self::ExtraFile { name } => write!(f, "undeclared file {name}"),
            Self::UnsafeArtifactName { name } => {
                write!(f, "artifact name {name:?} is not a plain file name")
            }
            Self::ManifestInvalid { detail } => write!(f, "invalid manifest: {detail}"),
            Self::DigestMismatch { stored, recomputed } => {
                write!(f, "stored digest {stored} != recomputed {recomputed}")
            }
            Self::Verify(e) => write!(f, "report verification failed: {e}"),
        }
    }
}

impl std::error::Error for ReportDirError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Verify(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ReportVerifyError> for ReportDirError {
    fn from(e: ReportVerifyError) -> Self {
        Self::Verify(e)
    }
}

/// Write `report` into `dir`, creating it if needed.
///
/// Each file goes through a temp file and a rename.
///
/// # Errors
///
/// [`ReportDirError::UnsafeArtifactName`] for names containing a path
/// separator, [`ReportDirError::Io`] otherwise.
pub fn write_report_dir(report: &RunReport, dir: &Path) -> Result<(), ReportDirError> {
    for name in report.artifacts.keys() {
        check_name(name)?;
    }
    std::fs::create_dir_all(dir).map_err(|e| io("create_dir_all", dir, &e))?;

    for artifact in report.artifacts.values() {
        write_file(dir, &artifact.name, &artifact.content)?;
    }
    write_file(dir, MANIFEST_FILE, &report.manifest)?;
    write_file(dir, DIGEST_BASIS_FILE, &report.digest_basis)?;
    write_file(dir, DIGEST_FILE, report.digest.as_str().as_bytes())?;
    log::debug!("wrote report {} to {}", report.digest, dir.display());
    Ok(())
}

/// Read a report directory back into a [`RunReport`].
///
/// Content hashes are taken from the manifest as declared, so a tampered
/// artifact surfaces in [`verify_report_dir`] as a hash mismatch.
///
/// # Errors
///
/// Returns [`ReportDirError`] for any fail-closed condition listed in the
/// module docs.
pub fn read_report_dir(dir: &Path) -> Result<RunReport, ReportDirError> {
    let manifest = read_metadata(dir, MANIFEST_FILE)?;
    let digest_basis = read_metadata(dir, DIGEST_BASIS_FILE)?;
    let stored_digest = read_metadata(dir, DIGEST_FILE)?;

    let mut artifacts = BTreeMap::new();
    for (name, content_hash, normative) in manifest_entries(&manifest)? {
        check_name(&name)?;
        let content = std::fs::read(dir.join(&name))
            .map_err(|_| ReportDirError::MissingArtifact { name: name.clone() })?;
        artifacts.insert(
            name.clone(),
            ReportArtifact {
                name,
                content,
                content_hash,
                normative,
            },
        );
    }

    let metadata = [MANIFEST_FILE, DIGEST_BASIS_FILE, DIGEST_FILE];
    for file in list_files(dir)? {
        if !artifacts.contains_key(&file) && !metadata.contains(&file.as_str()) {
            return Err(ReportDirError::ExtraFile { name: file });
        }
    }

    let recomputed = canonical_hash(HashDomain::ReportDigest, &digest_basis);
    let stored = String::from_utf8_lossy(&stored_digest).trim().to_string();
    if stored != recomputed.as_str() {
        return Err(ReportDirError::DigestMismatch {
            stored,
            recomputed: recomputed.to_string(),
        });
    }

    Ok(RunReport {
        artifacts,
        manifest,
        digest_basis,
        digest: recomputed,
    })
}

/// Read a report directory and run [`verify_report`] on it.
///
/// # Errors
///
/// Any [`read_report_dir`] failure, or [`ReportDirError::Verify`].
pub fn verify_report_dir(dir: &Path) -> Result<RunReport, ReportDirError> {
    let report = read_report_dir(dir)?;
    verify_report(&report)?;
    Ok(report)
}

fn manifest_entries(manifest: &[u8]) -> Result<Vec<(String, ContentHash, bool)>, ReportDirError> {
    let invalid = |detail: String| ReportDirError::ManifestInvalid { detail };
    let value: serde_json::Value =
        serde_json::from_slice(manifest).map_err(|e| invalid(e.to_string()))?;

    let schema = value.get("schema_version").and_then(serde_json::Value::as_str);
    if schema != Some(MANIFEST_SCHEMA) {
        return Err(invalid(format!("unexpected schema_version {schema:?}")));
    }
    let entries = value
        .get("artifacts")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| invalid("\"artifacts\" is not an array".into()))?;

    entries
        .iter()
        .map(|entry| {
            let name = entry
                .get("name")
                .and_then(serde_json::Value::as_str)
                .ok_or_else(|| invalid("entry without \"name\"".into()))?;
            let hash = entry
                .get("content_hash")
                .and_then(serde_json::Value::as_str)
                .and_then(ContentHash::parse)
                .ok_or_else(|| invalid(format!("bad content_hash for {name}")))?;
            let normative = entry
                .get("normative")
                .and_then(serde_json::Value::as_bool)
                .ok_or_else(|| invalid(format!("missing normative flag for {name}")))?;
            Ok((name.to_string(), hash, normative))
        })
        .collect()
}

fn check_name(name: &str) -> Result<(), ReportDirError> {
    let plain = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !matches!(name, MANIFEST_FILE | DIGEST_BASIS_FILE | DIGEST_FILE);
    if plain {
        Ok(())
    } else {
        Err(ReportDirError::UnsafeArtifactName {
            name: name.to_string(),
        })
    }
}

fn write_file(dir: &Path, name: &str, content: &[u8]) -> Result<(), ReportDirError> {
    let target = dir.join(name);
    let temp = dir.join(format!("{TEMP_PREFIX}{name}"));
    std::fs::write(&temp, content).map_err(|e| io("write", &temp, &e))?;
    std::fs::rename(&temp, &target).map_err(|e| io("rename", &target, &e))
}

fn read_metadata(dir: &Path, file: &str) -> Result<Vec<u8>, ReportDirError> {
    std::fs::read(dir.join(file)).map_err(|_| ReportDirError::MissingMetadata {
        file: file.to_string(),
    })
}

/// Regular file names in `dir`, leftover temp files excluded.
fn list_files(dir: &Path) -> Result<BTreeSet<String>, ReportDirError> {
    let mut files = BTreeSet::new();
    for entry in std::fs::read_dir(dir).map_err(|e| io("read_dir", dir, &e))? {
        let entry = entry.map_err(|e| io("read_dir entry", dir, &e))?;
        let is_file = entry
            .file_type()
            .map_err(|e| io("file_type", &entry.path(), &e))?
            .is_file();
        if !is_file {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if !name.starts_with(TEMP_PREFIX) {
                files.insert(name.to_string());
            }
        }
    }
    Ok(files)
}

fn io(op: &str, path: &Path, e: &std::io::Error) -> ReportDirError {
    ReportDirError::Io {
        detail: format!("{op} {}: {e}", path.display()),
    }
}
