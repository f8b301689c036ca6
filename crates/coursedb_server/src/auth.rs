//! Publisher authentication.
//!
//! Write endpoints (deploy, course/section/lesson upserts, category
//! ordering) are gated by a publisher token using HMAC-SHA256. Tokens
//! carry a timestamp for expiration checking.
//!
//! ## Token Format
//!
//! - 2 bytes: subject length (big-endian)
//! - N bytes: subject (UTF-8 publisher name)
//! - 8 bytes: timestamp (Unix millis, big-endian)
//! - 32 bytes: HMAC-SHA256 signature over everything before it
//!
//! Tokens travel as raw bytes; transport adapters typically
//! base64-encode them into an `Authorization` header.

use crate::error::{ApiError, ApiResult};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_LEN: usize = 32;
const TIMESTAMP_LEN: usize = 8;

/// Validator (and minter) of publisher tokens.
#[derive(Clone)]
pub struct TokenValidator {
    secret: Vec<u8>,
    token_expiry: Duration,
}

impl TokenValidator {
    /// Creates a validator over the shared secret.
    #[must_use]
    pub fn new(secret: Vec<u8>, token_expiry: Duration) -> Self {
        Self {
            secret,
            token_expiry,
        }
    }

    /// Mints a token for a publisher subject.
    pub fn mint(&self, subject: &str) -> ApiResult<Vec<u8>> {
        let subject_bytes = subject.as_bytes();
        if subject_bytes.is_empty() || subject_bytes.len() > u16::MAX as usize {
            return Err(ApiError::invalid_request("Invalid token subject"));
        }

        let timestamp = now_ms();
        let mut data = Vec::with_capacity(2 + subject_bytes.len() + TIMESTAMP_LEN);
        data.extend_from_slice(&(subject_bytes.len() as u16).to_be_bytes());
        data.extend_from_slice(subject_bytes);
        data.extend_from_slice(&timestamp.to_be_bytes());

        let signature = self.sign(&data);
        let mut token = data;
        token.extend_from_slice(&signature);
        Ok(token)
    }

    /// Validates a token and returns its subject.
    pub fn validate(&self, token: &[u8]) -> ApiResult<String> {
        if token.len() < 2 + TIMESTAMP_LEN + SIGNATURE_LEN {
            return Err(ApiError::NotAuthorized("Invalid token length".into()));
        }

        let subject_len = u16::from_be_bytes([token[0], token[1]]) as usize;
        let expected_len = 2 + subject_len + TIMESTAMP_LEN + SIGNATURE_LEN;
        if token.len() != expected_len {
            return Err(ApiError::NotAuthorized("Invalid token length".into()));
        }

        let signed = &token[..2 + subject_len + TIMESTAMP_LEN];
        let signature = &token[2 + subject_len + TIMESTAMP_LEN..];
        let expected_signature = self.sign(signed);
        if signature != expected_signature.as_slice() {
            return Err(ApiError::NotAuthorized("Invalid signature".into()));
        }

        let subject = std::str::from_utf8(&token[2..2 + subject_len])
            .map_err(|_| ApiError::NotAuthorized("Invalid token subject".into()))?
            .to_string();

        let mut timestamp_bytes = [0u8; TIMESTAMP_LEN];
        timestamp_bytes.copy_from_slice(&token[2 + subject_len..2 + subject_len + TIMESTAMP_LEN]);
        let timestamp = u64::from_be_bytes(timestamp_bytes);
        let expiry_millis = self.token_expiry.as_millis() as u64;
        if now_ms() > timestamp + expiry_millis {
            return Err(ApiError::NotAuthorized("Token expired".into()));
        }

        Ok(subject)
    }

    /// Signs data with HMAC-SHA256.
    fn sign(&self, data: &[u8]) -> [u8; SIGNATURE_LEN] {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size");
        mac.update(data);
        mac.finalize().into_bytes().into()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> TokenValidator {
        TokenValidator::new(
            b"test-secret-key-32-bytes-long!!".to_vec(),
            Duration::from_secs(3600),
        )
    }

    #[test]
    fn mint_and_validate() {
        let validator = validator();
        let token = validator.mint("authoring-cli").unwrap();
        let subject = validator.validate(&token).unwrap();
        assert_eq!(subject, "authoring-cli");
    }

    #[test]
    fn reject_tampered_token() {
        let validator = validator();
        let mut token = validator.mint("authoring-cli").unwrap();
        let last = token.len() - 1;
        token[last] ^= 0xFF;
        assert!(validator.validate(&token).is_err());
    }

    #[test]
    fn reject_wrong_secret() {
        let token = validator().mint("authoring-cli").unwrap();
        let other = TokenValidator::new(b"another-secret".to_vec(), Duration::from_secs(3600));
        assert!(other.validate(&token).is_err());
    }

    #[test]
    fn reject_truncated_token() {
        let validator = validator();
        let token = validator.mint("authoring-cli").unwrap();
        assert!(validator.validate(&token[..10]).is_err());
    }

    #[test]
    fn reject_expired_token() {
        let validator =
            TokenValidator::new(b"test-secret".to_vec(), Duration::from_secs(0));
        let token = validator.mint("authoring-cli").unwrap();
        std::thread::sleep(Duration::from_millis(10));
        assert!(validator.validate(&token).is_err());
    }

    #[test]
    fn reject_empty_subject() {
        assert!(validator().mint("").is_err());
    }
}
