//! User entity <-> model mapper

use chatlog_core::entities::User;
use chatlog_core::value_objects::Snowflake;

use crate::models::UserModel;

/// Convert UserModel to User entity
impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.user_id),
            username: model.username,
            discriminator: model.discriminator,
            bot: model.bot,
            system: model.system,
            disabled: model.disabled,
            created_at: model.created_at,
        }
    }
}

/// Convert User entity reference to values for database insertion
pub struct UserInsert<'a> {
    pub user_id: i64,
    pub username: &'a str,
    pub discriminator: Option<&'a str>,
    pub bot: bool,
    pub system: bool,
}

impl<'a> UserInsert<'a> {
    pub fn new(user: &'a User) -> Self {
        Self {
            user_id: user.id.into_inner(),
            username: &user.username,
            discriminator: user.discriminator.as_deref(),
            bot: user.bot,
            system: user.system,
        }
    }
}
