//! API key resolution and validation.
//!
//! The key is looked up in order of precedence:
//! 1. `--api-key` command-line flag
//! 2. `OMNIVORE_API_KEY` environment variable (a `.env` file is loaded first)
//! 3. Interactive prompt on the terminal
//!
//! A malformed key from the flag or the environment is fatal. At the prompt the
//! user is simply asked again.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::config::API_KEY_ENV_VAR;
use crate::error_handling::CredentialError;

static API_KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("API key pattern is a valid regex")
});

/// Where an API key was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// `--api-key`
    Flag,
    /// `OMNIVORE_API_KEY`
    Environment,
    /// Typed at the prompt
    Prompt,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Flag => write!(f, "--api-key"),
            CredentialSource::Environment => write!(f, "{}", API_KEY_ENV_VAR),
            CredentialSource::Prompt => write!(f, "prompt"),
        }
    }
}

/// A format-checked API key. Sent verbatim in the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Validates `raw` (surrounding whitespace ignored).
    pub fn parse(raw: &str, origin: CredentialSource) -> Result<Self, CredentialError> {
        let trimmed = raw.trim();
        if is_valid_api_key(trimmed) {
            Ok(ApiKey(trimmed.to_string()))
        } else {
            Err(CredentialError::Invalid { origin })
        }
    }

    /// The key as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keeps the key out of logs and panic messages.
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey(****{})", &self.0[self.0.len().saturating_sub(4)..])
    }
}

/// Checks the 8-4-4-4-12 hexadecimal layout of an Omnivore API key.
pub fn is_valid_api_key(candidate: &str) -> bool {
    API_KEY_PATTERN.is_match(candidate)
}

/// Resolves the API key from the flag, the environment or the terminal.
pub fn resolve_api_key(flag: Option<&str>) -> Result<ApiKey, CredentialError> {
    let env_value = std::env::var(API_KEY_ENV_VAR).ok();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stderr();
    resolve_api_key_from(flag, env_value.as_deref(), &mut input, &mut output)
}

/// [`resolve_api_key`] on tokio's blocking pool, so a prompt waiting on stdin
/// does not stall the runtime.
pub async fn resolve_api_key_async(flag: Option<String>) -> Result<ApiKey, CredentialError> {
    tokio::task::spawn_blocking(move || resolve_api_key(flag.as_deref()))
        .await
        .map_err(|e| CredentialError::Prompt(io::Error::other(e)))?
}

/// Resolution with explicit sources, for callers that do not use the process
/// environment or terminal.
///
/// Empty flag or environment values count as absent.
pub fn resolve_api_key_from<R: BufRead, W: Write>(
    flag: Option<&str>,
    env_value: Option<&str>,
    input: &mut R,
    output: &mut W,
) -> Result<ApiKey, CredentialError> {
    if let Some(raw) = flag.filter(|v| !v.trim().is_empty()) {
        debug!("Using API key from --api-key");
        return ApiKey::parse(raw, CredentialSource::Flag);
    }

    if let Some(raw) = env_value.filter(|v| !v.trim().is_empty()) {
        debug!("Using API key from {}", API_KEY_ENV_VAR);
        return ApiKey::parse(raw, CredentialSource::Environment);
    }

    prompt_for_api_key(input, output)
}

fn prompt_for_api_key<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<ApiKey, CredentialError> {
    loop {
        write!(output, "Enter your Omnivore API key: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(CredentialError::PromptClosed);
        }

        match ApiKey::parse(&line, CredentialSource::Prompt) {
            Ok(key) => return Ok(key),
            Err(_) => {
                writeln!(
                    output,
                    "That does not look like an API key (expected xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx)."
                )?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const VALID: &str = "0a1b2c3d-4e5f-6071-8293-a4b5c6d7e8f9";
    const OTHER_VALID: &str = "FFFFFFFF-0000-1111-2222-333344445555";

    fn no_input() -> Cursor<Vec<u8>> {
        Cursor::new(Vec::new())
    }

    #[test]
    fn test_is_valid_api_key() {
        assert!(is_valid_api_key(VALID));
        assert!(is_valid_api_key(OTHER_VALID));
        assert!(!is_valid_api_key(""));
        assert!(!is_valid_api_key("0a1b2c3d4e5f607182 93a4b5c6d7e8f9"));
        assert!(!is_valid_api_key("0a1b2c3d-4e5f-6071-8293-a4b5c6d7e8f")); // 35 chars
        assert!(!is_valid_api_key("0a1b2c3g-4e5f-6071-8293-a4b5c6d7e8f9")); // non-hex
        assert!(!is_valid_api_key(&format!("{VALID}0")));
    }

    #[test]
    fn test_flag_takes_precedence_over_env() {
        let mut out = Vec::new();
        let key =
            resolve_api_key_from(Some(VALID), Some(OTHER_VALID), &mut no_input(), &mut out).unwrap();
        assert_eq!(key.as_str(), VALID);
        assert!(out.is_empty(), "no prompt expected");
    }

    #[tokio::test]
    async fn test_async_resolution_uses_flag() {
        let key = resolve_api_key_async(Some(VALID.to_string())).await.unwrap();
        assert_eq!(key.as_str(), VALID);

        let err = resolve_api_key_async(Some("not-a-key".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CredentialError::Invalid {
                origin: CredentialSource::Flag
            }
        ));
    }

    #[test]
    fn test_env_used_when_flag_absent() {
        let mut out = Vec::new();
        let key = resolve_api_key_from(None, Some(OTHER_VALID), &mut no_input(), &mut out).unwrap();
        assert_eq!(key.as_str(), OTHER_VALID);
    }

    #[test]
    fn test_invalid_flag_is_fatal_even_with_valid_env() {
        let mut out = Vec::new();
        let err = resolve_api_key_from(Some("nope"), Some(VALID), &mut no_input(), &mut out)
            .unwrap_err();
        assert!(matches!(
            err,
            CredentialError::Invalid {
                origin: CredentialSource::Flag
            }
        ));
    }

    #[test]
    fn test_invalid_env_is_fatal() {
        let mut out = Vec::new();
        let mut input = Cursor::new(format!("{VALID}\n").into_bytes());
        let err = resolve_api_key_from(None, Some("bad-key"), &mut input, &mut out).unwrap_err();
        assert!(matches!(
            err,
            CredentialError::Invalid {
                origin: CredentialSource::Environment
            }
        ));
        assert!(err.to_string().contains(API_KEY_ENV_VAR));
    }

    #[test]
    fn test_prompt_reprompts_until_valid() {
        let mut out = Vec::new();
        let mut input = Cursor::new(format!("first try\n\n  {VALID}  \n").into_bytes());
        let key = resolve_api_key_from(None, None, &mut input, &mut out).unwrap();
        assert_eq!(key.as_str(), VALID);

        let transcript = String::from_utf8(out).unwrap();
        assert_eq!(transcript.matches("Enter your Omnivore API key").count(), 3);
        assert_eq!(transcript.matches("does not look like").count(), 2);
    }

    #[test]
    fn test_blank_flag_and_env_fall_through_to_prompt() {
        let mut out = Vec::new();
        let mut input = Cursor::new(format!("{VALID}\n").into_bytes());
        let key = resolve_api_key_from(Some("  "), Some(""), &mut input, &mut out).unwrap();
        assert_eq!(key.as_str(), VALID);
    }

    #[test]
    fn test_prompt_eof_is_an_error() {
        let mut out = Vec::new();
        let mut input = Cursor::new(b"garbage\n".to_vec());
        let err = resolve_api_key_from(None, None, &mut input, &mut out).unwrap_err();
        assert!(matches!(err, CredentialError::PromptClosed));
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = ApiKey::parse(VALID, CredentialSource::Flag).unwrap();
        let printed = format!("{key:?}");
        assert!(!printed.contains("0a1b2c3d"));
        assert!(printed.ends_with("e8f9)"));
    }
}
