mod signer;
mod es256;
mod key;

pub use signer::RequestSigner;
pub use es256::Es256Signer;
pub use key::KeySource;
