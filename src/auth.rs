//! Auth-domain models: scope lists, claims context, token requests, and issued tokens.

pub mod claims;
pub mod request;
pub mod scope;
pub mod token;

pub use claims::*;
pub use request::*;
pub use scope::*;
pub use token::*;
