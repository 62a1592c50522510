pub mod auth;
pub mod block;
pub mod calendar;
pub mod db;
pub mod diary;
pub mod history;
pub mod init;
pub mod run;

use crate::{
    db::users::Users,
    libs::{
        formatter::{parse_date, parse_datetime, today},
        messages::Message,
        session::SessionState,
    },
    msg_error_anyhow,
};
use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Manage blocks and roulettes")]
    Block(block::BlockArgs),
    #[command(about = "Spin a roulette")]
    Spin(run::SpinArgs),
    #[command(about = "Run a block and tick its subtasks")]
    Run(run::RunArgs),
    #[command(about = "Show past runs and the weekly streak")]
    History(history::HistoryArgs),
    #[command(about = "Mood diary")]
    Diary(diary::DiaryArgs),
    #[command(about = "Events, tasks and holidays")]
    Calendar(calendar::CalendarArgs),
    #[command(about = "Create a local account")]
    Signup(auth::SignupArgs),
    #[command(about = "Sign in")]
    Login(auth::LoginArgs),
    #[command(about = "Sign out")]
    Logout,
    #[command(about = "Show the signed-in account")]
    Whoami,
    #[command(about = "Store maintenance")]
    Db(db::DbArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Block(args) => block::cmd(args),
            Commands::Spin(args) => run::spin(args),
            Commands::Run(args) => run::run(args),
            Commands::History(args) => history::cmd(args),
            Commands::Diary(args) => diary::cmd(args),
            Commands::Calendar(args) => calendar::cmd(args),
            Commands::Signup(args) => with_session(|users, session| auth::signup(args, users, session)),
            Commands::Login(args) => with_session(|users, session| auth::login(args, users, session)),
            Commands::Logout => with_session(auth::logout),
            Commands::Whoami => with_session(|_, session| auth::whoami(session)),
            Commands::Db(args) => db::cmd(args),
        }
    }
}

/// Restores the persisted session and hands it to an account command.
fn with_session<F>(handler: F) -> Result<()>
where
    F: FnOnce(&mut Users, &mut SessionState) -> Result<()>,
{
    let mut users = Users::new()?;
    let mut session = SessionState::init(&users)?;
    handler(&mut users, &mut session)
}

/// Parses a `YYYY-MM-DD` argument; `None` and `today` mean the current day.
pub(crate) fn date_arg(value: Option<String>) -> Result<NaiveDate> {
    match value.as_deref().map(str::trim) {
        None | Some("today") => Ok(today()),
        Some(raw) => parse_date(raw).ok_or_else(|| msg_error_anyhow!(Message::InvalidDate(raw.to_string()))),
    }
}

pub(crate) fn datetime_arg(value: &str) -> Result<NaiveDateTime> {
    parse_datetime(value).ok_or_else(|| msg_error_anyhow!(Message::InvalidDateTime(value.to_string())))
}
