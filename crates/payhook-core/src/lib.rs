pub mod domain;
pub mod dto;
pub mod error;
pub mod nodes;
pub mod rules;

pub use domain::*;
pub use dto::*;
pub use error::CoreError;
pub use nodes::{resolve_contexts, NodeNames, NodeOutputs, ResolveError};
pub use rules::*;
