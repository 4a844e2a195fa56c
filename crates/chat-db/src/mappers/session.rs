//! SessionModel -> Session mapper

use chat_core::entities::Session;
use chat_core::value_objects::UserId;

use crate::models::SessionModel;

impl From<SessionModel> for Session {
    fn from(model: SessionModel) -> Self {
        Session {
            token: model.session_token,
            user_id: UserId::new(model.user_id),
            expires_at: model.expires_at,
        }
    }
}
