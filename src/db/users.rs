//! Local accounts and the persisted sign-in session.
//!
//! Passwords are stored and compared as plain text. The store is a single
//! local file owned by one person; nothing here is an authentication
//! boundary.

use crate::db::db::{logged_step, Db};
use crate::libs::error::{CoreError, CoreResult};
use crate::libs::formatter::{format_datetime, now};
use crate::libs::messages::Message;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const INSERT_USER: &str = "INSERT INTO users (email, password, name, created_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_USER: &str = "SELECT id, email, name, created_at FROM users WHERE id = ?1";
const SELECT_USER_BY_EMAIL: &str = "SELECT id, email, name, created_at FROM users WHERE email = ?1";
const SELECT_PASSWORD: &str = "SELECT password FROM users WHERE id = ?1";
const EMAIL_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)";
const REPLACE_SESSION: &str = "INSERT OR REPLACE INTO session (id, user_id, started_at) VALUES (1, ?1, ?2)";
const SELECT_SESSION: &str = "SELECT user_id, started_at FROM session WHERE id = 1";
const DELETE_SESSION: &str = "DELETE FROM session";

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub created_at: NaiveDateTime,
}

pub struct Users {
    conn: Connection,
}

impl Users {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self::from_db(Db::new()?))
    }

    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        Ok(Self::from_db(Db::open(path)?))
    }

    pub fn from_db(db: Db) -> Self {
        Users { conn: db.into_connection() }
    }

    /// Creates an account and signs it in.
    pub fn signup(&mut self, email: &str, password: &str, name: &str) -> CoreResult<User> {
        let email = normalize_email(email)?;
        if password.is_empty() {
            return Err(CoreError::validation(Message::PasswordRequired));
        }

        let taken: bool = self.conn.query_row(EMAIL_EXISTS, params![email], |row| row.get(0))?;
        if taken {
            return Err(CoreError::validation(Message::EmailTaken(email)));
        }

        let created_at = now();
        let tx = self.conn.transaction()?;
        logged_step(
            "insert_user",
            0,
            tx.execute(INSERT_USER, params![email, password, name.trim(), format_datetime(&created_at)]),
        )?;
        let id = tx.last_insert_rowid();
        logged_step("start_session", id, tx.execute(REPLACE_SESSION, params![id, format_datetime(&created_at)]))?;
        tx.commit()?;

        tracing::info!(user_id = id, "account created");
        Ok(User {
            id,
            email,
            name: name.trim().to_string(),
            created_at,
        })
    }

    /// Checks the credentials and replaces the persisted session.
    pub fn login(&mut self, email: &str, password: &str) -> CoreResult<User> {
        let email = normalize_email(email)?;
        let user = self
            .find_by_email(&email)?
            .ok_or_else(|| CoreError::not_found("account", &email))?;

        let stored: String = self.conn.query_row(SELECT_PASSWORD, params![user.id], |row| row.get(0))?;
        if stored != password {
            tracing::warn!(user_id = user.id, "rejected sign-in");
            return Err(CoreError::validation(Message::InvalidCredentials));
        }

        self.conn.execute(REPLACE_SESSION, params![user.id, format_datetime(&now())])?;
        tracing::info!(user_id = user.id, "signed in");
        Ok(user)
    }

    pub fn get(&self, id: i64) -> CoreResult<Option<User>> {
        Ok(self.conn.query_row(SELECT_USER, params![id], user_from_row).optional()?)
    }

    pub fn find_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        let email = email.trim().to_lowercase();
        Ok(self.conn.query_row(SELECT_USER_BY_EMAIL, params![email], user_from_row).optional()?)
    }

    /// The signed-in account and when the session started.
    pub fn current_session(&self) -> CoreResult<Option<(User, NaiveDateTime)>> {
        let session: Option<(i64, NaiveDateTime)> = self
            .conn
            .query_row(SELECT_SESSION, [], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()?;

        match session {
            Some((user_id, started_at)) => Ok(self.get(user_id)?.map(|user| (user, started_at))),
            None => Ok(None),
        }
    }

    pub fn clear_session(&mut self) -> CoreResult<()> {
        self.conn.execute(DELETE_SESSION, [])?;
        Ok(())
    }
}

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn normalize_email(email: &str) -> CoreResult<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(CoreError::validation(Message::InvalidEmail(email)));
    }
    Ok(email)
}
