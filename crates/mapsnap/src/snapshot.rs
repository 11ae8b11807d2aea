use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use tracing::debug;

use crate::encoding::encode_query;
use crate::error::Result;
use crate::request::MapRequest;
use crate::signing::{Es256Signer, KeySource, RequestSigner};

pub const BASE_URL: &str = "https://snapshot.apple-mapkit.com";
pub const API_PATH: &str = "/api/v1/snapshot";

/// The path the signature is computed over: `API_PATH?query`.
pub fn canonical_path(query: &str) -> String {
    format!("{API_PATH}?{query}")
}

/// Signs the canonical path and appends `&signature=` with the signature in
/// unpadded URL-safe base64.
pub fn sign_path(canonical_path: &str, signer: &dyn RequestSigner) -> Result<String> {
    let signature = signer.sign(canonical_path.as_bytes())?;
    Ok(format!(
        "{canonical_path}&signature={}",
        URL_SAFE_NO_PAD.encode(signature)
    ))
}

pub fn assemble_url(base_url: &str, signed_path: &str) -> String {
    format!("{}{signed_path}", base_url.trim_end_matches('/'))
}

/// A serialized and signed snapshot request.
///
/// Only the signed path survives construction: the request, its team and
/// key identifiers, and the private key are all dropped before `new`
/// returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    signed_path: String,
    url: String,
}

impl Snapshot {
    /// Loads the key from `key`, signs `request` and discards both.
    pub fn new(request: MapRequest, key: KeySource) -> Result<Self> {
        let path = Self::prepare(request)?;
        let signed_path = {
            let signer = Es256Signer::load(&key)?;
            drop(key);
            sign_path(&path, &signer)?
        };
        Ok(Self::from_signed_path(signed_path))
    }

    /// Signs with a signer the caller keeps, for issuing many URLs from one
    /// loaded key.
    pub fn with_signer(request: MapRequest, signer: &dyn RequestSigner) -> Result<Self> {
        let path = Self::prepare(request)?;
        Ok(Self::from_signed_path(sign_path(&path, signer)?))
    }

    fn prepare(request: MapRequest) -> Result<String> {
        request.validate()?;
        let query = encode_query(&request)?;
        Ok(canonical_path(&query))
    }

    fn from_signed_path(signed_path: String) -> Self {
        let url = assemble_url(BASE_URL, &signed_path);
        debug!(len = url.len(), "assembled snapshot url");
        Self { signed_path, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// `API_PATH?query&signature=...`, without the host.
    pub fn signed_path(&self) -> &str {
        &self.signed_path
    }

    /// The exact bytes that were signed.
    pub fn canonical_path(&self) -> &str {
        self.signed_path
            .rsplit_once("&signature=")
            .map_or(self.signed_path.as_str(), |(path, _)| path)
    }

    /// The unpadded URL-safe base64 signature.
    pub fn signature(&self) -> &str {
        self.signed_path
            .rsplit_once("&signature=")
            .map_or("", |(_, signature)| signature)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
