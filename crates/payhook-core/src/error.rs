use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("transactionID is missing")]
    MissingTransactionId,
    #[error("invalid phone: {digits} digits, at least {min} required")]
    InvalidPhone { digits: usize, min: usize },
    #[error("invalid country prefix: {0:?}")]
    InvalidCountryPrefix(String),
}
