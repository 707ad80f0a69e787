//! Ed25519 request verification.
//!
//! The platform signs `timestamp || body` with the application's key and
//! sends the hex-encoded signature and the timestamp as headers.

use ed25519_dalek::{Signature, Verifier as _, VerifyingKey};
use thiserror::Error;

/// Errors raised before a signature can be checked.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignatureError {
    /// The signature or key is not valid hex.
    #[error("malformed hex in {field}: {source}")]
    MalformedHex {
        /// Which input failed to decode.
        field: &'static str,
        /// Decoder error.
        #[source]
        source: hex::FromHexError,
    },

    /// The key is not a 32-byte Ed25519 point.
    #[error("invalid Ed25519 public key")]
    InvalidPublicKey,
}

/// Check a hex signature over `timestamp || body` against a hex public key.
///
/// Returns `Ok(false)` for a well-formed but wrong signature, including one
/// of the wrong length.
pub fn verify(
    signature_hex: &str,
    timestamp: &str,
    body: &[u8],
    public_key_hex: &str,
) -> Result<bool, SignatureError> {
    let verifier = Verifier::from_hex(public_key_hex)?;
    verifier.verify(signature_hex, timestamp, body)
}

/// A parsed application public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verifier {
    key: VerifyingKey,
}

impl Verifier {
    /// Parse a hex public key.
    pub fn from_hex(public_key_hex: &str) -> Result<Self, SignatureError> {
        let bytes = hex::decode(public_key_hex).map_err(|source| SignatureError::MalformedHex {
            field: "public key",
            source,
        })?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| SignatureError::InvalidPublicKey)?;
        let key = VerifyingKey::from_bytes(&bytes).map_err(|_| SignatureError::InvalidPublicKey)?;
        Ok(Self { key })
    }

    /// Wrap an already parsed key.
    pub fn from_key(key: VerifyingKey) -> Self {
        Self { key }
    }

    /// Check a hex signature over `timestamp || body`.
    pub fn verify(
        &self,
        signature_hex: &str,
        timestamp: &str,
        body: &[u8],
    ) -> Result<bool, SignatureError> {
        let signature = hex::decode(signature_hex).map_err(|source| {
            SignatureError::MalformedHex {
                field: "signature",
                source,
            }
        })?;
        let Ok(signature) = Signature::from_slice(&signature) else {
            return Ok(false);
        };

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);
        Ok(self.key.verify(&message, &signature).is_ok())
    }

    /// Check the signature headers of a request.
    ///
    /// Missing headers, malformed hex and bad signatures are all `false`.
    pub fn verify_headers(
        &self,
        signature: Option<&str>,
        timestamp: Option<&str>,
        body: &[u8],
    ) -> bool {
        match (signature, timestamp) {
            (Some(signature), Some(timestamp)) => {
                self.verify(signature, timestamp, body).unwrap_or(false)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    fn keypair() -> (SigningKey, String) {
        let signing = SigningKey::from_bytes(&[7u8; 32]);
        let public = hex::encode(signing.verifying_key().to_bytes());
        (signing, public)
    }

    fn sign(key: &SigningKey, timestamp: &str, body: &[u8]) -> String {
        let mut message = timestamp.as_bytes().to_vec();
        message.extend_from_slice(body);
        hex::encode(key.sign(&message).to_bytes())
    }

    #[test]
    fn round_trip_verifies() {
        let (key, public) = keypair();
        let body = br#"{"type":1}"#;
        let signature = sign(&key, "1700000000", body);
        assert_eq!(verify(&signature, "1700000000", body, &public), Ok(true));
    }

    #[test]
    fn tampered_inputs_fail() {
        let (key, public) = keypair();
        let body = br#"{"type":1}"#.to_vec();
        let signature = sign(&key, "1700000000", &body);

        let mut tampered = body.clone();
        tampered[2] ^= 0x01;
        assert_eq!(verify(&signature, "1700000000", &tampered, &public), Ok(false));
        assert_eq!(verify(&signature, "1700000001", &body, &public), Ok(false));

        let mut bad_signature = signature.into_bytes();
        bad_signature[0] = if bad_signature[0] == b'0' { b'1' } else { b'0' };
        let bad_signature = String::from_utf8(bad_signature).unwrap();
        assert_eq!(verify(&bad_signature, "1700000000", &body, &public), Ok(false));
    }

    #[test]
    fn short_signature_is_false() {
        let (_, public) = keypair();
        assert_eq!(verify("abcd", "1", b"{}", &public), Ok(false));
    }

    #[test]
    fn malformed_hex_is_an_error() {
        let (_, public) = keypair();
        assert!(matches!(
            verify("zz", "1", b"{}", &public),
            Err(SignatureError::MalformedHex { field: "signature", .. })
        ));
        assert!(matches!(
            Verifier::from_hex("abc"),
            Err(SignatureError::MalformedHex { field: "public key", .. })
        ));
    }

    #[test]
    fn wrong_key_length_is_invalid() {
        assert_eq!(
            Verifier::from_hex("abcd"),
            Err(SignatureError::InvalidPublicKey)
        );
    }

    #[test]
    fn missing_headers_are_false() {
        let (key, public) = keypair();
        let verifier = Verifier::from_hex(&public).unwrap();
        let signature = sign(&key, "1", b"{}");
        assert!(verifier.verify_headers(Some(&signature), Some("1"), b"{}"));
        assert!(!verifier.verify_headers(None, Some("1"), b"{}"));
        assert!(!verifier.verify_headers(Some(&signature), None, b"{}"));
        assert!(!verifier.verify_headers(Some("not hex"), Some("1"), b"{}"));
    }
}
