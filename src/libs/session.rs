//! Who is signed in, as an explicit value passed to the command handlers.
//!
//! [`SessionState::init`] restores the persisted session at startup and
//! [`SessionState::teardown`] clears it on sign-out.

use crate::db::users::{User, Users};
use crate::libs::error::CoreResult;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    current: Option<(User, NaiveDateTime)>,
}

impl SessionState {
    pub fn init(users: &Users) -> CoreResult<Self> {
        let current = users.current_session()?;
        if let Some((user, _)) = &current {
            tracing::debug!(user_id = user.id, "session restored");
        }
        Ok(SessionState { current })
    }

    pub fn signup(&mut self, users: &mut Users, email: &str, password: &str, name: &str) -> CoreResult<&User> {
        let user = users.signup(email, password, name)?;
        let started_at = user.created_at;
        Ok(&self.current.insert((user, started_at)).0)
    }

    pub fn login(&mut self, users: &mut Users, email: &str, password: &str) -> CoreResult<&User> {
        let user = users.login(email, password)?;
        let started_at = users.current_session()?.map(|(_, at)| at).unwrap_or(user.created_at);
        Ok(&self.current.insert((user, started_at)).0)
    }

    pub fn teardown(&mut self, users: &mut Users) -> CoreResult<()> {
        users.clear_session()?;
        if let Some((user, _)) = self.current.take() {
            tracing::debug!(user_id = user.id, "session cleared");
        }
        Ok(())
    }

    pub fn user(&self) -> Option<&User> {
        self.current.as_ref().map(|(user, _)| user)
    }

    pub fn started_at(&self) -> Option<NaiveDateTime> {
        self.current.as_ref().map(|(_, at)| *at)
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }
}
