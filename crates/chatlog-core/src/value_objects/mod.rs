//! Value objects - immutable types that represent domain concepts

mod fingerprint;
mod snowflake;

pub use fingerprint::ContentFingerprint;
pub use snowflake::{Snowflake, SnowflakeParseError};
