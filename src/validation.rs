//! Format checks for addresses, hashes, call ids and signatures.
//!
//! Every check is exact-length and hex-only. The `parse_*` helpers return
//! the typed value once the format check passes.

use alloy::primitives::{Address, Signature, B256};

use crate::error::{AppError, Result};

/// Hex digits in a 20-byte address.
const ADDRESS_HEX_LEN: usize = 40;
/// Hex digits in a 32-byte hash.
const HASH_HEX_LEN: usize = 64;
/// Hex digits in a 65-byte `r || s || v` signature.
const SIGNATURE_HEX_LEN: usize = 130;

fn strip_hex_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

fn is_hex_of_len(digits: &str, len: usize) -> bool {
    digits.len() == len && digits.bytes().all(|b| b.is_ascii_hexdigit())
}

/// `0x`/`0X` followed by exactly 40 hex digits, any case.
pub fn is_valid_address(s: &str) -> bool {
    strip_hex_prefix(s).is_some_and(|digits| is_hex_of_len(digits, ADDRESS_HEX_LEN))
}

/// `0x` followed by exactly 64 hex digits.
pub fn is_valid_hash(s: &str) -> bool {
    s.strip_prefix("0x").is_some_and(|digits| is_hex_of_len(digits, HASH_HEX_LEN))
}

/// Call ids and proposals share the 32-byte hash format.
pub fn is_valid_call_id(s: &str) -> bool {
    is_valid_hash(s)
}

/// `0x` followed by exactly 130 hex digits.
pub fn is_valid_signature(s: &str) -> bool {
    s.strip_prefix("0x").is_some_and(|digits| is_hex_of_len(digits, SIGNATURE_HEX_LEN))
}

/// A valid address whose letter case matches its EIP-55 checksum.
pub fn is_checksum_address(s: &str) -> bool {
    s.starts_with("0x") && is_valid_address(s) && Address::parse_checksummed(s, None).is_ok()
}

/// Parse an address after checking its format.
pub fn parse_address(s: &str) -> Result<Address> {
    let trimmed = s.trim();
    if !is_valid_address(trimmed) {
        return Err(AppError::InvalidAddress(s.to_string()));
    }

    // `Address::from_str` rejects the uppercase `0X` prefix.
    let digits = strip_hex_prefix(trimmed).unwrap_or(trimmed);
    digits.parse::<Address>().map_err(|e| AppError::InvalidAddress(format!("{s}: {e}")))
}

/// Parse a 32-byte hash (also used for call ids and proposals).
pub fn parse_hash(s: &str) -> Result<B256> {
    if !is_valid_hash(s) {
        return Err(AppError::Parse(format!("Invalid hash: '{s}'")));
    }
    s.parse::<B256>().map_err(|e| AppError::Parse(format!("Invalid hash '{s}': {e}")))
}

/// Parse a 65-byte signature.
pub fn parse_signature(s: &str) -> Result<Signature> {
    if !is_valid_signature(s) {
        return Err(AppError::Parse(format!("Invalid signature: '{s}'")));
    }
    let bytes = alloy::hex::decode(s)?;
    Signature::try_from(bytes.as_slice())
        .map_err(|e| AppError::Parse(format!("Invalid signature '{s}': {e}")))
}

/// clap value parser for address arguments.
pub fn address_arg(s: &str) -> std::result::Result<Address, String> {
    parse_address(s).map_err(|_| format!("Invalid address: '{s}'"))
}
