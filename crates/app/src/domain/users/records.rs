//! User Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// User UUID
pub type UserUuid = TypedUuid<UserRecord>;

/// User Record
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Identity that owns orders and API tokens.
    pub uuid: UserUuid,

    pub name: String,

    pub created_at: Timestamp,

    pub updated_at: Timestamp,
}
