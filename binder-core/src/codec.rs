//! Flag Vector ⇄ Token codec.
//!
//! ## Wire format
//!
//! 1. Flags are packed 8 per byte, most significant bit first: flag `k` lives
//!    at bit `7 - (k % 8)` of byte `k / 8`. Unused low bits of the last byte
//!    are written as zero.
//! 2. The bytes are base64-encoded with the URL-safe alphabet (`-` for `+`,
//!    `_` for `/`) and no `=` padding.
//!
//! Decoding accepts either alphabet and stray padding, and never fails in
//! [`decode`]: whatever cannot be read is treated as unchecked.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::error::CodecError;
use crate::flags::{FlagVector, Token};

const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone),
);

/// Encode `flags` into its token. Total: an empty vector yields an empty token.
pub fn encode(flags: &FlagVector) -> Token {
    Token::from(TOKEN_ENGINE.encode(pack(flags)))
}

/// Strictly decode `token` into a vector of `len` flags.
///
/// Short tokens are still accepted (missing flags read as false); only
/// characters outside the alphabet and impossible lengths are errors.
pub fn try_decode(token: &str, len: usize) -> Result<FlagVector, CodecError> {
    let normalized = normalize(token);
    if let Some((position, character)) = normalized
        .char_indices()
        .find(|(_, c)| !is_token_char(*c))
    {
        return Err(CodecError::InvalidCharacter {
            position,
            character,
        });
    }
    if normalized.len() % 4 == 1 {
        return Err(CodecError::InvalidLength {
            length: normalized.len(),
        });
    }
    let bytes = TOKEN_ENGINE.decode(normalized.as_bytes())?;
    Ok(unpack(&bytes, len))
}

/// Decode `token` into a vector of `len` flags, zero-filling anything that
/// cannot be read.
///
/// A corrupted token keeps the flags encoded before the first bad character.
pub fn decode(token: &str, len: usize) -> FlagVector {
    match try_decode(token, len) {
        Ok(flags) => flags,
        Err(e) => {
            tracing::warn!("tolerating malformed token ({e}); unreadable flags left unchecked");
            salvage(token, len)
        }
    }
}

/// Pack flags into bytes, most significant bit first.
pub fn pack(flags: &FlagVector) -> Vec<u8> {
    let mut bytes = vec![0u8; flags.len().div_ceil(8)];
    for (k, flag) in flags.iter().enumerate() {
        if flag {
            bytes[k / 8] |= 1u8 << (7 - (k % 8));
        }
    }
    bytes
}

/// Unpack `len` flags from `bytes`; missing bytes read as zero and surplus
/// bits are ignored.
pub fn unpack(bytes: &[u8], len: usize) -> FlagVector {
    (0..len)
        .map(|k| {
            bytes
                .get(k / 8)
                .is_some_and(|byte| (byte >> (7 - (k % 8))) & 1 == 1)
        })
        .collect::<Vec<_>>()
        .into()
}

fn salvage(token: &str, len: usize) -> FlagVector {
    let normalized = normalize(token);
    let mut readable: String = normalized.chars().take_while(|c| is_token_char(*c)).collect();
    if readable.len() % 4 == 1 {
        readable.pop();
    }
    let bytes = TOKEN_ENGINE.decode(readable.as_bytes()).unwrap_or_default();
    unpack(&bytes, len)
}

fn normalize(token: &str) -> String {
    token
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect()
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}
