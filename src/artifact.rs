//! Model artifact: a fitted model plus what is needed to trust it.
//!
//! The file is a single bincode envelope:
//!
//! | field            | content                               |
//! |------------------|---------------------------------------|
//! | `magic`          | `b"MEDCOST\0"`                        |
//! | `format_version` | [`FORMAT_VERSION`]                    |
//! | `encoding`       | the [`EncodingTable`] used in training |
//! | `summary`        | optional [`TrainingSummary`]          |
//! | `params`         | the model's `ParamsRepr`              |
//!
//! Floats are stored bit-exact, so a loaded model predicts exactly what the
//! saved one did.

use crate::error::ArtifactError;
use crate::model::InferenceModel;
use crate::preprocessing::{EncodingTable, ENCODING_VERSION};
use crate::serialization::SerializableParams;
use bincode::Options;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Leading bytes of every artifact.
pub const MAGIC: [u8; 8] = *b"MEDCOST\0";
/// Envelope layout version.
pub const FORMAT_VERSION: u32 = 1;
/// Default artifact location, relative to the working directory.
pub const DEFAULT_ARTIFACT_PATH: &str = "rf_tuned.bin";

/// In-sample training figures stored alongside the model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub n_samples: usize,
    pub r_squared: f64,
    pub rmse: f64,
    pub mae: f64,
}

#[derive(Serialize, Deserialize)]
struct Header {
    magic: [u8; 8],
    format_version: u32,
}

#[derive(Serialize, Deserialize)]
struct Envelope<P> {
    magic: [u8; 8],
    format_version: u32,
    encoding: EncodingTable,
    summary: Option<TrainingSummary>,
    params: P,
}

/// A fitted model together with its training summary.
#[derive(Clone, Debug)]
pub struct Artifact<M> {
    pub model: M,
    pub summary: Option<TrainingSummary>,
}

impl<M: InferenceModel> Artifact<M> {
    pub fn new(model: M, summary: Option<TrainingSummary>) -> Self {
        Self { model, summary }
    }

    /// Encode to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        let envelope = Envelope {
            magic: MAGIC,
            format_version: FORMAT_VERSION,
            encoding: EncodingTable::current(),
            summary: self.summary,
            params: self.model.extract_params(),
        };
        Ok(envelope.to_bytes()?)
    }

    /// Decode from bytes, checking magic, version and encoding table before
    /// rebuilding the model. Bytes after the envelope are an error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        if bytes.len() < MAGIC.len() || bytes[..MAGIC.len()] != MAGIC {
            return Err(ArtifactError::BadMagic);
        }
        let header = Header::from_bytes(bytes)?;
        if header.format_version != FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion {
                found: header.format_version,
                expected: FORMAT_VERSION,
            });
        }

        // Same layout as `bincode::serialize`, but nothing may follow the params.
        let envelope: Envelope<M::ParamsRepr> = bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .reject_trailing_bytes()
            .deserialize(bytes)?;
        if !envelope.encoding.is_current() {
            return Err(ArtifactError::EncodingMismatch {
                found: envelope.encoding.version,
                expected: ENCODING_VERSION,
            });
        }

        let model = M::from_params(envelope.params)?;
        Ok(Self {
            model,
            summary: envelope.summary,
        })
    }

    /// Write to `path`, replacing any previous file.
    ///
    /// Bytes go to a sibling `.tmp` file first and are renamed into place.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ArtifactError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp = temp_path(path);
        fs::write(&tmp, &bytes).map_err(|source| ArtifactError::Io {
            path: tmp.clone(),
            source,
        })?;
        if let Err(source) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            });
        }

        log::info!("saved artifact ({} bytes) to {}", bytes.len(), path.display());
        Ok(())
    }

    /// Read and validate the artifact at `path`.
    ///
    /// # Errors
    /// [`ArtifactError::Missing`] if there is no file, otherwise the first
    /// check that fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ArtifactError::Missing {
                path: path.to_path_buf(),
            },
            _ => ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let artifact = Self::from_bytes(&bytes)?;
        log::info!(
            "loaded artifact from {} ({} features)",
            path.display(),
            artifact.model.n_features()
        );
        Ok(artifact)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
