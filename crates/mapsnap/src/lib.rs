pub mod annotation;
pub mod encoding;
pub mod error;
pub mod fetch;
pub mod request;
pub mod signing;
pub mod snapshot;
pub mod types;

pub use annotation::Annotation;
pub use encoding::{ParamValue, encode_query};
pub use error::{MapSnapError, Result};
pub use fetch::ImageFetcher;
pub use request::MapRequest;
pub use signing::{Es256Signer, KeySource, RequestSigner};
pub use snapshot::{API_PATH, BASE_URL, Snapshot, assemble_url, canonical_path, sign_path};
pub use types::{Center, ColorScheme, Image, MapType, MarkerStyle, Offset, Overlay, Size, Span};
