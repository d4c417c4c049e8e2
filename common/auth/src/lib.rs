pub mod claims;
pub mod config;
pub mod error;
pub mod extractors;
pub mod issuer;
pub mod source;
pub mod verifier;

pub use claims::Claims;
pub use config::JwtConfig;
pub use error::{AuthError, AuthResult};
pub use extractors::AuthContext;
pub use issuer::TokenIssuer;
pub use source::{BearerHeader, PathScopedQueryParam, TokenSource, TokenSources};
pub use verifier::TokenVerifier;
