use crate::error::Result;

/// Trait for signing the canonical snapshot path.
///
/// Implementations are sync, signing is CPU-bound. A signer holds only
/// read-only key state and may be shared across threads.
pub trait RequestSigner: Send + Sync {
    /// Sign the UTF-8 bytes of the canonical path. Returns raw signature bytes.
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Algorithm identifier string (e.g. "ES256").
    fn algorithm(&self) -> &str;
}
