//! Access gate.
//!
//! When an access code is configured, the tool refuses to run until
//! the caller supplies the matching code.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Access code required. Pass --access-code or set MINUTA_ACCESS_CODE")]
    CodeRequired,

    #[error("Access code rejected")]
    CodeRejected,
}

/// Hash an access code string using SHA-256.
fn hash_code(code: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hasher.finalize().into()
}

/// Check a supplied code against the configured one.
///
/// With no configured code the gate is open. Codes are compared as
/// SHA-256 digests in constant time to prevent timing attacks.
pub fn check_access(configured: Option<&str>, supplied: Option<&str>) -> Result<(), GateError> {
    let expected = match configured {
        Some(code) => code,
        None => {
            tracing::debug!("No access code configured, gate open");
            return Ok(());
        }
    };

    let given = match supplied {
        Some(code) => code,
        None => return Err(GateError::CodeRequired),
    };

    let expected_hash = hash_code(expected);
    let given_hash = hash_code(given);
    if expected_hash.ct_eq(&given_hash).unwrap_u8() == 0 {
        return Err(GateError::CodeRejected);
    }

    Ok(())
}
