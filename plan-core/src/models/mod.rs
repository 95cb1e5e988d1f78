mod project;
mod todo;

pub use project::*;
pub use todo::*;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::Serializer;
use thiserror::Error;
use uuid::Uuid;

/// Longest accepted project or todo name, in characters.
pub const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {MAX_NAME_LEN} characters (got {0})")]
    NameTooLong(usize),
}

/// Fresh record id, an opaque string to everything downstream.
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time at the millisecond precision records are stored with.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Writes timestamps with exactly three fraction digits so their text
/// sorts in time order.
pub(crate) fn serialize_timestamp<S: Serializer>(
    value: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}

pub(crate) fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if len == 0 {
        return Err(ValidationError::EmptyName);
    }
    if len > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong(len));
    }
    Ok(())
}
