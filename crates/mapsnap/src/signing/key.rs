use std::fmt;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::error::{MapSnapError, Result};

/// Where the PEM-encoded MapKit private key comes from.
///
/// Key text read from either source lives in a [`Zeroizing`] buffer and is
/// wiped as soon as it has been parsed.
pub enum KeySource {
    /// Path to a `.p8` (PKCS#8) or `openssl ec` (SEC1) PEM file.
    File(PathBuf),
    /// PEM text already in memory.
    Pem(Zeroizing<String>),
}

impl KeySource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn pem(pem: impl Into<String>) -> Self {
        Self::Pem(Zeroizing::new(pem.into()))
    }

    pub(crate) fn read(&self) -> Result<Zeroizing<String>> {
        match self {
            Self::File(path) => read_key_file(path),
            Self::Pem(pem) => Ok(pem.clone()),
        }
    }
}

fn read_key_file(path: &Path) -> Result<Zeroizing<String>> {
    let bytes = Zeroizing::new(std::fs::read(path).map_err(|e| {
        MapSnapError::KeyLoad(format!("reading {}: {e}", path.display()))
    })?);
    let text = std::str::from_utf8(&bytes).map_err(|_| {
        MapSnapError::KeyLoad(format!("{} is not PEM text", path.display()))
    })?;
    Ok(Zeroizing::new(text.to_string()))
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Pem(_) => f.write_str("Pem(<redacted>)"),
        }
    }
}
