pub mod authorizer;
pub mod factory;
pub mod policy;
pub mod principal;
pub mod token;

pub use authorizer::{AuthorizeError, Authorizer};
pub use factory::{build_authorizer, build_principal_extractor};
