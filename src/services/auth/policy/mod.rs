//! Gateway access-policy construction.
pub mod builder;
pub mod document;
pub mod error;
pub mod method_arn;
pub mod rule;
pub mod verb;

pub use builder::{ApiOptions, PolicyBuilder};
pub use document::{AuthorizerResponse, PolicyDocument, Statement};
pub use error::PolicyError;
pub use method_arn::{MethodArn, MethodArnError};
pub use rule::{Conditions, Effect, MethodRule};
pub use verb::{HttpVerb, MethodVerb};
