//! Co-versioned model, scaler and label map.

use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{decode_frame, encode_frame, ArtifactKind, Fingerprint, FORMAT_VERSION};
use crate::classification::{ModelKind, StressModel};
use crate::encoder::N_FEATURES;
use crate::error::{HealthError, Result};
use crate::preprocessing::{LabelEncoder, StandardScaler};
use crate::traits::Classifier;

/// Model artifact file name.
pub const MODEL_FILE: &str = "model.s2h";
/// Scaler artifact file name.
pub const SCALER_FILE: &str = "scaler.s2h";
/// Label map artifact file name.
pub const LABELS_FILE: &str = "labels.s2h";

/// Everything a fitted classifier needs, saved and loaded as one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBundle {
    /// Fitted classifier
    pub model: StressModel,
    /// Scaler fitted on the training split
    pub scaler: StandardScaler,
    /// Label ↔ index map
    pub labels: LabelEncoder,
}

/// Metadata reported by `s2h info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleInfo {
    /// Format version
    pub version: u32,
    /// Bundle fingerprint, hex
    pub fingerprint: String,
    /// Strategy name
    pub model_kind: ModelKind,
    /// Class labels in index order
    pub classes: Vec<String>,
    /// Scaler width
    pub n_features: usize,
    /// Per-feature training means
    pub scaler_mean: Vec<f32>,
    /// Per-feature training standard deviations
    pub scaler_std: Vec<f32>,
}

impl ModelBundle {
    /// Bundles fitted components after checking they agree.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::ArtifactMismatch`] as [`ModelBundle::validate`].
    pub fn new(model: StressModel, scaler: StandardScaler, labels: LabelEncoder) -> Result<Self> {
        let bundle = Self {
            model,
            scaler,
            labels,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    /// Checks that every component is fitted and their dimensions agree.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::ArtifactMismatch`] describing the disagreement.
    pub fn validate(&self) -> Result<()> {
        let n_classes = self
            .model
            .n_classes()
            .ok_or_else(|| HealthError::mismatch("model is not fitted"))?;
        match self.scaler.n_features() {
            Some(N_FEATURES) => {}
            Some(n) => {
                return Err(HealthError::mismatch(format!(
                    "scaler has {n} features, expected {N_FEATURES}"
                )))
            }
            None => return Err(HealthError::mismatch("scaler is not fitted")),
        }
        if self.labels.n_classes() != n_classes {
            return Err(HealthError::mismatch(format!(
                "label map has {} classes, model has {n_classes}",
                self.labels.n_classes()
            )));
        }
        Ok(())
    }

    fn payloads(&self) -> Result<[Vec<u8>; 3]> {
        Ok([
            bincode::serialize(&self.model)?,
            serde_json::to_vec(&self.scaler)?,
            serde_json::to_vec(&self.labels)?,
        ])
    }

    /// Fingerprint of the current contents.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::Serialization`] if a component cannot be encoded.
    pub fn fingerprint(&self) -> Result<Fingerprint> {
        let [model, scaler, labels] = self.payloads()?;
        Ok(Fingerprint::of_payloads(&model, &scaler, &labels))
    }

    /// Writes the three artifacts into `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if validation, encoding or any write fails.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<Fingerprint> {
        self.validate()?;
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let [model, scaler, labels] = self.payloads()?;
        let fingerprint = Fingerprint::of_payloads(&model, &scaler, &labels);
        for (kind, file, payload) in [
            (ArtifactKind::Model, MODEL_FILE, &model),
            (ArtifactKind::Scaler, SCALER_FILE, &scaler),
            (ArtifactKind::Labels, LABELS_FILE, &labels),
        ] {
            std::fs::write(dir.join(file), encode_frame(kind, &fingerprint, payload))?;
        }

        tracing::info!(
            dir = %dir.display(),
            fingerprint = %fingerprint.short(),
            model = %self.model.kind(),
            "saved model bundle"
        );
        Ok(fingerprint)
    }

    /// Reads and cross-checks the three artifacts in `dir`.
    ///
    /// # Errors
    ///
    /// - [`HealthError::ArtifactMismatch`] if a file is missing, the
    ///   fingerprints disagree or the components are inconsistent
    /// - [`HealthError::ChecksumMismatch`] for a corrupted payload
    /// - [`HealthError::UnsupportedVersion`] for another format version
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_fingerprint(dir).map(|(bundle, _)| bundle)
    }

    /// Loads a bundle and describes it.
    ///
    /// # Errors
    ///
    /// Same as [`ModelBundle::load`].
    pub fn inspect(dir: impl AsRef<Path>) -> Result<BundleInfo> {
        let (bundle, fingerprint) = Self::load_with_fingerprint(dir)?;
        Ok(BundleInfo {
            version: FORMAT_VERSION,
            fingerprint: fingerprint.to_hex(),
            model_kind: bundle.model.kind(),
            classes: bundle.labels.classes().to_vec(),
            n_features: bundle.scaler.n_features().unwrap_or(0),
            scaler_mean: bundle.scaler.mean().map(<[f32]>::to_vec).unwrap_or_default(),
            scaler_std: bundle.scaler.std().map(<[f32]>::to_vec).unwrap_or_default(),
        })
    }

    fn load_with_fingerprint(dir: impl AsRef<Path>) -> Result<(Self, Fingerprint)> {
        let dir = dir.as_ref();
        let model_bytes = read_artifact(dir, MODEL_FILE)?;
        let scaler_bytes = read_artifact(dir, SCALER_FILE)?;
        let labels_bytes = read_artifact(dir, LABELS_FILE)?;

        let (model_header, model_payload) =
            decode_frame(&model_bytes, ArtifactKind::Model, MODEL_FILE)?;
        let (scaler_header, scaler_payload) =
            decode_frame(&scaler_bytes, ArtifactKind::Scaler, SCALER_FILE)?;
        let (labels_header, labels_payload) =
            decode_frame(&labels_bytes, ArtifactKind::Labels, LABELS_FILE)?;

        let stored = model_header.fingerprint;
        for (file, header) in [(SCALER_FILE, scaler_header), (LABELS_FILE, labels_header)] {
            if header.fingerprint != stored {
                tracing::warn!(file, "artifact fingerprint disagrees with {MODEL_FILE}");
                return Err(HealthError::mismatch(format!(
                    "{file} belongs to bundle {}, {MODEL_FILE} to {}",
                    header.fingerprint.short(),
                    stored.short()
                )));
            }
        }
        let recomputed = Fingerprint::of_payloads(model_payload, scaler_payload, labels_payload);
        if recomputed != stored {
            tracing::warn!(dir = %dir.display(), "bundle fingerprint does not match contents");
            return Err(HealthError::mismatch(format!(
                "contents hash to {}, headers say {}",
                recomputed.short(),
                stored.short()
            )));
        }

        let bundle = Self {
            model: bincode::deserialize(model_payload)?,
            scaler: serde_json::from_slice(scaler_payload)?,
            labels: serde_json::from_slice(labels_payload)?,
        };
        bundle.validate()?;
        tracing::info!(
            dir = %dir.display(),
            fingerprint = %stored.short(),
            model = %bundle.model.kind(),
            "loaded model bundle"
        );
        Ok((bundle, stored))
    }
}

fn read_artifact(dir: &Path, file: &str) -> Result<Vec<u8>> {
    std::fs::read(dir.join(file)).map_err(|e| match e.kind() {
        ErrorKind::NotFound => {
            HealthError::mismatch(format!("missing {file} in {}", dir.display()))
        }
        _ => HealthError::Io(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::SoftmaxRegression;
    use crate::primitives::Matrix;
    use crate::traits::Transformer;

    fn fitted_bundle(shift: f32) -> ModelBundle {
        let x = Matrix::from_vec(
            4,
            N_FEATURES,
            vec![
                4.0 + shift, 0.0, 12.0, 0.0, //
                5.0, 0.0, 11.0, 1.0, //
                8.0, 2.0, 7.0, 2.0, //
                7.5, 2.0, 8.0, 1.0,
            ],
        )
        .expect("4x4");
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&x).expect("scale");
        let mut labels = LabelEncoder::new();
        let y = labels.fit_transform(&["high", "high", "low", "low"]).expect("labels");
        let mut model = StressModel::Logistic(SoftmaxRegression::new().with_max_iter(50));
        model.fit(&scaled, &y).expect("fit");
        ModelBundle::new(model, scaler, labels).expect("consistent")
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bundle = fitted_bundle(0.0);
        let fp = bundle.save(dir.path()).expect("save");
        assert_eq!(fp, bundle.fingerprint().expect("fingerprint"));

        let loaded = ModelBundle::load(dir.path()).expect("load");
        assert_eq!(loaded, bundle);
    }

    #[test]
    fn test_inspect() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bundle = fitted_bundle(0.0);
        let fp = bundle.save(dir.path()).expect("save");
        let info = ModelBundle::inspect(dir.path()).expect("inspect");
        assert_eq!(info.fingerprint, fp.to_hex());
        assert_eq!(info.model_kind, ModelKind::Logistic);
        assert_eq!(info.classes, vec!["high".to_string(), "low".to_string()]);
        assert_eq!(info.n_features, N_FEATURES);
        assert_eq!(info.scaler_mean.len(), N_FEATURES);
    }

    #[test]
    fn test_missing_artifact_is_mismatch() {
        let dir = tempfile::tempdir().expect("tempdir");
        fitted_bundle(0.0).save(dir.path()).expect("save");
        std::fs::remove_file(dir.path().join(LABELS_FILE)).expect("remove");
        let err = ModelBundle::load(dir.path()).unwrap_err();
        assert!(matches!(err, HealthError::ArtifactMismatch { .. }));
        assert!(err.to_string().contains(LABELS_FILE));
    }

    #[test]
    fn test_scaler_from_other_run_rejected() {
        let a = tempfile::tempdir().expect("tempdir");
        let b = tempfile::tempdir().expect("tempdir");
        fitted_bundle(0.0).save(a.path()).expect("save a");
        fitted_bundle(1.0).save(b.path()).expect("save b");
        std::fs::copy(b.path().join(SCALER_FILE), a.path().join(SCALER_FILE)).expect("copy");

        assert!(matches!(
            ModelBundle::load(a.path()),
            Err(HealthError::ArtifactMismatch { .. })
        ));
    }

    #[test]
    fn test_corrupted_payload_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        fitted_bundle(0.0).save(dir.path()).expect("save");
        let path = dir.path().join(MODEL_FILE);
        let mut bytes = std::fs::read(&path).expect("read");
        let last = bytes.len() - 1;
        bytes[last] ^= 0x5A;
        std::fs::write(&path, bytes).expect("write");

        assert!(matches!(
            ModelBundle::load(dir.path()),
            Err(HealthError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_new_rejects_inconsistent_parts() {
        let bundle = fitted_bundle(0.0);
        let labels = LabelEncoder::from_classes(&["high", "low", "medium"]);
        let err = ModelBundle::new(bundle.model.clone(), bundle.scaler.clone(), labels).unwrap_err();
        assert!(err.to_string().contains("3 classes"));

        let unfitted = StressModel::Logistic(SoftmaxRegression::new());
        assert!(ModelBundle::new(unfitted, bundle.scaler, bundle.labels).is_err());
    }
}
