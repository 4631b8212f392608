pub mod context;
pub mod phone;

pub use context::{
    record_from_value, unwrap_item, TransactionContext, WebhookBody, WebhookContext,
};
pub use phone::{
    coerce_to_string, normalize_phone, strip_non_digits, CountryPrefix, PhoneRules,
    DEFAULT_COUNTRY_PREFIX, DEFAULT_MIN_PHONE_DIGITS,
};
