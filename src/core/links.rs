//! Short id derivation
//!
//! Ids are derived from the URL itself, so shortening the same address twice
//! yields the same id. The scheme is ignored: `http://x` and `https://x` share
//! an id.

use super::deletion::ShortId;
use crate::utils::error::{Result, ShortenerError};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};

/// Bytes of the digest kept in the id (11 base64 characters)
const ID_BYTES: usize = 8;

/// Derive the short id for `url`, rejecting anything without a scheme and host
pub fn short_id_for(url: &str) -> Result<ShortId> {
    let url = url.trim();
    let rest = match url.split_once("://") {
        Some((scheme, rest)) if !scheme.is_empty() && !rest.is_empty() => rest,
        _ => return Err(ShortenerError::bad_request(format!("Invalid URL: {:?}", url))),
    };

    let digest = Sha256::digest(rest.as_bytes());
    Ok(ShortId::new(URL_SAFE_NO_PAD.encode(&digest[..ID_BYTES])))
}
