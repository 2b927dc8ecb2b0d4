//! Credential material, OAuth1 request signing, and the session token model.

pub mod credentials;
pub mod oauth1;
pub mod secret;
pub mod token;

pub use credentials::*;
pub use oauth1::*;
pub use secret::*;
pub use token::*;
