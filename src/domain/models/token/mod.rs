pub mod token;

pub use token::{AuthClaims, TokenClaims, TokenPair};
