//! User model -> entity mapper

use payfeed_core::entities::{Role, User};
use payfeed_core::value_objects::Snowflake;

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            username: model.username,
            email: model.email,
            // The column has a CHECK constraint; anything else is treated as a plain user
            role: model.role.parse().unwrap_or(Role::User),
            created_at: model.created_at,
        }
    }
}
