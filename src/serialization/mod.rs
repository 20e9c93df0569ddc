//! Binary framing for trained artifacts.
//!
//! Every artifact file shares one layout:
//!
//! ```text
//! ┌──────────────┬─────────────┬─────────────┬──────────────────┬──────────┬─────────┐
//! │ magic S2H\0  │ version u32 │ kind u32    │ fingerprint 32 B │ crc32    │ payload │
//! └──────────────┴─────────────┴─────────────┴──────────────────┴──────────┴─────────┘
//! ```
//!
//! Integers are little-endian. The fingerprint ties the three files of one
//! [`ModelBundle`] together; the CRC covers the payload only.

mod bundle;

pub use bundle::{BundleInfo, ModelBundle, LABELS_FILE, MODEL_FILE, SCALER_FILE};

use std::fmt;

use sha2::{Digest, Sha256};

use crate::error::{HealthError, Result};

/// File magic.
pub const MAGIC: &[u8; 4] = b"S2H\0";
/// Format version written by this build and the only one it reads.
pub const FORMAT_VERSION: u32 = 1;
/// Bytes before the payload.
pub const HEADER_LEN: usize = 4 + 4 + 4 + 32 + 4;

/// What an artifact file contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Fitted classifier, bincode payload
    Model,
    /// Fitted scaler, JSON payload
    Scaler,
    /// Label map, JSON payload
    Labels,
}

impl ArtifactKind {
    /// Tag stored in the header.
    #[must_use]
    pub fn tag(self) -> u32 {
        match self {
            ArtifactKind::Model => 1,
            ArtifactKind::Scaler => 2,
            ArtifactKind::Labels => 3,
        }
    }

    /// Inverse of [`ArtifactKind::tag`].
    #[must_use]
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            1 => Some(ArtifactKind::Model),
            2 => Some(ArtifactKind::Scaler),
            3 => Some(ArtifactKind::Labels),
            _ => None,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArtifactKind::Model => "model",
            ArtifactKind::Scaler => "scaler",
            ArtifactKind::Labels => "labels",
        })
    }
}

/// SHA-256 identity shared by the artifacts of one training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint(pub [u8; 32]);

impl Fingerprint {
    /// Hash of the three payload digests, in model, scaler, labels order.
    #[must_use]
    pub fn of_payloads(model: &[u8], scaler: &[u8], labels: &[u8]) -> Self {
        let mut outer = Sha256::new();
        for payload in [model, scaler, labels] {
            outer.update(Sha256::digest(payload));
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&outer.finalize());
        Self(bytes)
    }

    /// Lowercase hex rendering.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// First eight hex digits, for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        self.to_hex()[..8].to_string()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Parsed header of an artifact file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactHeader {
    /// Format version
    pub version: u32,
    /// Artifact kind
    pub kind: ArtifactKind,
    /// Bundle fingerprint
    pub fingerprint: Fingerprint,
    /// CRC32 of the payload
    pub checksum: u32,
}

/// Frames a payload with a header.
#[must_use]
pub fn encode_frame(kind: ArtifactKind, fingerprint: &Fingerprint, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&kind.tag().to_le_bytes());
    out.extend_from_slice(&fingerprint.0);
    out.extend_from_slice(&crc32fast::hash(payload).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Sequential reader over a header with error context.
struct FrameReader<'a> {
    data: &'a [u8],
    name: &'a str,
    offset: usize,
}

impl<'a> FrameReader<'a> {
    fn take(&mut self, len: usize, field: &str) -> Result<&'a [u8]> {
        let bytes = self
            .data
            .get(self.offset..self.offset + len)
            .ok_or_else(|| HealthError::mismatch(format!("{}: truncated at {field}", self.name)))?;
        self.offset += len;
        Ok(bytes)
    }

    fn read_u32(&mut self, field: &str) -> Result<u32> {
        let bytes: [u8; 4] = self
            .take(4, field)?
            .try_into()
            .map_err(|_| HealthError::mismatch(format!("{}: bad {field}", self.name)))?;
        Ok(u32::from_le_bytes(bytes))
    }
}

/// Splits a framed artifact into header and verified payload.
///
/// `name` is used in error messages.
///
/// # Errors
///
/// - [`HealthError::ArtifactMismatch`] for bad magic, truncation, an
///   unknown kind or a kind other than `expected`
/// - [`HealthError::UnsupportedVersion`] for any other format version
/// - [`HealthError::ChecksumMismatch`] when the payload CRC disagrees
pub fn decode_frame<'a>(
    data: &'a [u8],
    expected: ArtifactKind,
    name: &'a str,
) -> Result<(ArtifactHeader, &'a [u8])> {
    let mut reader = FrameReader {
        data,
        name,
        offset: 0,
    };

    if reader.take(4, "magic")? != MAGIC {
        return Err(HealthError::mismatch(format!(
            "{name}: not a stress2health artifact"
        )));
    }

    let version = reader.read_u32("version")?;
    if version != FORMAT_VERSION {
        return Err(HealthError::UnsupportedVersion {
            found: version,
            supported: FORMAT_VERSION,
        });
    }

    let tag = reader.read_u32("kind")?;
    let kind = ArtifactKind::from_tag(tag)
        .ok_or_else(|| HealthError::mismatch(format!("{name}: unknown artifact kind {tag}")))?;
    if kind != expected {
        return Err(HealthError::mismatch(format!(
            "{name}: holds {kind} data, expected {expected}"
        )));
    }

    let mut fingerprint = [0u8; 32];
    fingerprint.copy_from_slice(reader.take(32, "fingerprint")?);
    let checksum = reader.read_u32("checksum")?;

    let payload = &data[reader.offset..];
    let actual = crc32fast::hash(payload);
    if actual != checksum {
        return Err(HealthError::ChecksumMismatch {
            artifact: name.to_string(),
            expected: checksum,
            actual,
        });
    }

    Ok((
        ArtifactHeader {
            version,
            kind,
            fingerprint: Fingerprint(fingerprint),
            checksum,
        },
        payload,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> (Fingerprint, Vec<u8>) {
        let fp = Fingerprint::of_payloads(b"m", b"s", b"l");
        (fp, encode_frame(ArtifactKind::Scaler, &fp, b"{\"mean\":[0.0]}"))
    }

    #[test]
    fn test_frame_layout() {
        let (fp, frame) = sample_frame();
        assert_eq!(&frame[..4], MAGIC);
        assert_eq!(u32::from_le_bytes([frame[4], frame[5], frame[6], frame[7]]), 1);
        assert_eq!(u32::from_le_bytes([frame[8], frame[9], frame[10], frame[11]]), 2);
        assert_eq!(&frame[12..44], &fp.0);
        assert_eq!(frame.len(), HEADER_LEN + 14);
    }

    #[test]
    fn test_decode_frame() {
        let (fp, frame) = sample_frame();
        let (header, payload) =
            decode_frame(&frame, ArtifactKind::Scaler, "scaler.s2h").expect("decode");
        assert_eq!(header.kind, ArtifactKind::Scaler);
        assert_eq!(header.fingerprint, fp);
        assert_eq!(payload, b"{\"mean\":[0.0]}");
    }

    #[test]
    fn test_decode_rejects_bad_magic() {
        let (_, mut frame) = sample_frame();
        frame[0] = b'X';
        assert!(matches!(
            decode_frame(&frame, ArtifactKind::Scaler, "scaler.s2h"),
            Err(HealthError::ArtifactMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_version() {
        let (_, mut frame) = sample_frame();
        frame[4..8].copy_from_slice(&9u32.to_le_bytes());
        assert!(matches!(
            decode_frame(&frame, ArtifactKind::Scaler, "scaler.s2h"),
            Err(HealthError::UnsupportedVersion { found: 9, supported: 1 })
        ));
    }

    #[test]
    fn test_decode_rejects_wrong_kind() {
        let (_, frame) = sample_frame();
        let err = decode_frame(&frame, ArtifactKind::Labels, "labels.s2h").unwrap_err();
        assert!(err.to_string().contains("expected labels"));
    }

    #[test]
    fn test_decode_detects_corruption() {
        let (_, mut frame) = sample_frame();
        let last = frame.len() - 1;
        frame[last] ^= 0xFF;
        assert!(matches!(
            decode_frame(&frame, ArtifactKind::Scaler, "scaler.s2h"),
            Err(HealthError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_truncated() {
        let (_, frame) = sample_frame();
        let err = decode_frame(&frame[..20], ArtifactKind::Scaler, "scaler.s2h").unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn test_fingerprint_depends_on_every_payload() {
        let base = Fingerprint::of_payloads(b"a", b"b", b"c");
        assert_ne!(base, Fingerprint::of_payloads(b"a", b"b", b"x"));
        assert_ne!(base, Fingerprint::of_payloads(b"b", b"a", b"c"));
        assert_eq!(base.to_hex().len(), 64);
        assert_eq!(base.short().len(), 8);
    }
}
