pub mod transform;
pub mod validation;

pub use transform::{transform, transform_with};
pub use validation::extract_transaction_id;
