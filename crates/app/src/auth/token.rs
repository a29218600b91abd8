//! API token format.
//!
//! A token reads `tl_<version>_<token uuid>.<secret hex>`, for example
//! `tl_v1_0191f0c9a3b07c52a1e4d2f1b0c9e8d7.<64 hex chars>`. The uuid names the
//! stored row; the secret is only ever held by the caller.

use std::{fmt, str::FromStr};

use rand::{RngCore, rngs::OsRng};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::domain::users::records::UserUuid;

pub const API_TOKEN_PREFIX: &str = "tl";

pub const API_TOKEN_SECRET_BYTES: usize = 32;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiTokenVersion {
    V1,
}

impl ApiTokenVersion {
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::V1 => 1,
        }
    }

    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::V1 => "v1",
        }
    }
}

impl TryFrom<i16> for ApiTokenVersion {
    type Error = ApiTokenError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            _ => Err(ApiTokenError::UnsupportedVersion),
        }
    }
}

impl FromStr for ApiTokenVersion {
    type Err = ApiTokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "v1" => Ok(Self::V1),
            _ => Err(ApiTokenError::UnsupportedVersion),
        }
    }
}

/// Secret half of a token. Zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiTokenSecret([u8; API_TOKEN_SECRET_BYTES]);

impl ApiTokenSecret {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; API_TOKEN_SECRET_BYTES]) -> Self {
        Self(bytes)
    }

    /// Draws a new secret from the operating system RNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; API_TOKEN_SECRET_BYTES];

        OsRng.fill_bytes(&mut bytes);

        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; API_TOKEN_SECRET_BYTES] {
        &self.0
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0
            .iter()
            .flat_map(|byte| [byte >> 4, byte & 0x0f])
            .map(|nibble| char::from(HEX_DIGITS[usize::from(nibble)]))
            .collect()
    }

    fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != API_TOKEN_SECRET_BYTES * 2 {
            return None;
        }

        let mut bytes = [0_u8; API_TOKEN_SECRET_BYTES];

        for (byte, pair) in bytes.iter_mut().zip(hex.as_bytes().chunks_exact(2)) {
            let [hi, lo] = pair else {
                return None;
            };

            *byte = (hex_value(*hi)? << 4) | hex_value(*lo)?;
        }

        Some(Self(bytes))
    }
}

impl fmt::Debug for ApiTokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiTokenSecret(**redacted**)")
    }
}

impl Drop for ApiTokenSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

fn hex_value(digit: u8) -> Option<u8> {
    char::from(digit)
        .to_digit(16)
        .and_then(|value| u8::try_from(value).ok())
}

#[derive(Debug, Clone)]
pub struct ParsedApiToken {
    pub token_uuid: Uuid,
    pub version: ApiTokenVersion,
    pub secret: ApiTokenSecret,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiTokenError {
    #[error("api token format is invalid")]
    InvalidFormat,

    #[error("api token uses an unsupported version")]
    UnsupportedVersion,

    #[error("api token secret encoding is invalid")]
    InvalidSecretEncoding,
}

#[must_use]
pub fn format_api_token(
    token_uuid: Uuid,
    version: ApiTokenVersion,
    secret: &ApiTokenSecret,
) -> String {
    format!(
        "{API_TOKEN_PREFIX}_{}_{}.{}",
        version.segment(),
        token_uuid.simple(),
        secret.to_hex()
    )
}

/// Splits a bearer value into its token uuid, version and secret.
///
/// # Errors
///
/// Returns an [`ApiTokenError`] describing the first malformed part.
pub fn parse_api_token(token: &str) -> Result<ParsedApiToken, ApiTokenError> {
    let (head, secret_hex) = token.split_once('.').ok_or(ApiTokenError::InvalidFormat)?;

    let rest = head
        .strip_prefix(API_TOKEN_PREFIX)
        .and_then(|rest| rest.strip_prefix('_'))
        .ok_or(ApiTokenError::InvalidFormat)?;

    let (version, token_uuid) = rest.split_once('_').ok_or(ApiTokenError::InvalidFormat)?;

    let version = version.parse::<ApiTokenVersion>()?;

    let token_uuid = Uuid::try_parse(token_uuid).map_err(|_| ApiTokenError::InvalidFormat)?;

    let secret = ApiTokenSecret::from_hex(secret_hex).ok_or(ApiTokenError::InvalidSecretEncoding)?;

    Ok(ParsedApiToken {
        token_uuid,
        version,
        secret,
    })
}

/// Bytes fed to the HMAC verifier for a token.
///
/// Binding the owning user into the input means a verifier copied onto another
/// user's row never validates.
#[must_use]
pub fn build_verifier_input(
    token_uuid: Uuid,
    version: ApiTokenVersion,
    user_uuid: UserUuid,
    secret: &ApiTokenSecret,
) -> Vec<u8> {
    format!(
        "{}:{}:{}:{}",
        token_uuid.simple(),
        version.as_i16(),
        user_uuid.into_uuid().simple(),
        secret.to_hex(),
    )
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const SECRET_HEX: &str = "abababababababababababababababababababababababababababababababab";

    #[test]
    fn format_uses_prefix_version_and_simple_uuid() {
        let secret = ApiTokenSecret::from_bytes([0xAB; API_TOKEN_SECRET_BYTES]);

        let token = format_api_token(Uuid::nil(), ApiTokenVersion::V1, &secret);

        assert_eq!(
            token,
            format!("tl_v1_00000000000000000000000000000000.{SECRET_HEX}")
        );
    }

    #[test]
    fn parse_reads_issued_token() -> TestResult {
        let token_uuid = Uuid::now_v7();
        let secret = ApiTokenSecret::generate();
        let token = format_api_token(token_uuid, ApiTokenVersion::V1, &secret);

        let parsed = parse_api_token(&token)?;

        assert_eq!(parsed.token_uuid, token_uuid);
        assert_eq!(parsed.version, ApiTokenVersion::V1);
        assert_eq!(parsed.secret, secret);

        Ok(())
    }

    #[test]
    fn parse_accepts_uppercase_secret() -> TestResult {
        let token = format!(
            "tl_v1_00000000000000000000000000000000.{}",
            SECRET_HEX.to_uppercase()
        );

        let parsed = parse_api_token(&token)?;

        assert_eq!(parsed.secret.as_bytes(), &[0xAB; API_TOKEN_SECRET_BYTES]);

        Ok(())
    }

    #[test]
    fn parse_rejects_foreign_prefix() {
        let token = format!("lt_v1_00000000000000000000000000000000.{SECRET_HEX}");

        assert_eq!(
            parse_api_token(&token).err(),
            Some(ApiTokenError::InvalidFormat)
        );
    }

    #[test]
    fn parse_rejects_unknown_version() {
        let token = format!("tl_v9_00000000000000000000000000000000.{SECRET_HEX}");

        assert_eq!(
            parse_api_token(&token).err(),
            Some(ApiTokenError::UnsupportedVersion)
        );
    }

    #[test]
    fn parse_rejects_bad_secret() {
        for secret in ["ab", "zz".repeat(API_TOKEN_SECRET_BYTES).as_str()] {
            let token = format!("tl_v1_00000000000000000000000000000000.{secret}");

            assert_eq!(
                parse_api_token(&token).err(),
                Some(ApiTokenError::InvalidSecretEncoding),
                "secret {secret:?} should be rejected"
            );
        }
    }

    #[test]
    fn parse_rejects_missing_separator() {
        assert_eq!(
            parse_api_token("tl_v1_00000000000000000000000000000000").err(),
            Some(ApiTokenError::InvalidFormat)
        );
    }

    #[test]
    fn debug_redacts_secret() {
        let secret = ApiTokenSecret::from_bytes([0xAB; API_TOKEN_SECRET_BYTES]);

        assert_eq!(format!("{secret:?}"), "ApiTokenSecret(**redacted**)");
    }

    #[test]
    fn verifier_input_binds_user() {
        let secret = ApiTokenSecret::from_bytes([0xCD; API_TOKEN_SECRET_BYTES]);
        let token_uuid = Uuid::nil();

        let first = build_verifier_input(token_uuid, ApiTokenVersion::V1, UserUuid::new(), &secret);
        let second =
            build_verifier_input(token_uuid, ApiTokenVersion::V1, UserUuid::new(), &secret);

        assert_ne!(first, second, "different users must yield different inputs");
    }

    #[test]
    fn verifier_input_layout() {
        let secret = ApiTokenSecret::from_bytes([0xAB; API_TOKEN_SECRET_BYTES]);
        let user = UserUuid::from_uuid(Uuid::nil());

        let input = build_verifier_input(Uuid::nil(), ApiTokenVersion::V1, user, &secret);

        assert_eq!(
            String::from_utf8_lossy(&input),
            format!(
                "00000000000000000000000000000000:1:00000000000000000000000000000000:{SECRET_HEX}"
            )
        );
    }
}
