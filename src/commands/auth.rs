//! Local account commands. The session they act on is created by
//! [`Cli::menu`](super::Cli::menu) and passed in.

use crate::{
    db::users::Users,
    libs::{formatter::format_datetime, messages::Message, session::SessionState},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Input, Password};

#[derive(Debug, Args)]
pub struct SignupArgs {
    #[arg(short, long)]
    email: Option<String>,
    #[arg(short, long)]
    name: Option<String>,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(short, long)]
    email: Option<String>,
}

pub fn signup(args: SignupArgs, users: &mut Users, session: &mut SessionState) -> Result<()> {
    let theme = ColorfulTheme::default();
    let email = match args.email {
        Some(email) => email,
        None => Input::with_theme(&theme).with_prompt(Message::PromptEmail.to_string()).interact_text()?,
    };
    let name = match args.name {
        Some(name) => name,
        None => Input::with_theme(&theme)
            .with_prompt(Message::PromptDisplayName.to_string())
            .allow_empty(true)
            .interact_text()?,
    };
    let password = Password::with_theme(&theme)
        .with_prompt(Message::PromptPassword.to_string())
        .with_confirmation(Message::PromptPasswordConfirm.to_string(), Message::PasswordMismatch.to_string())
        .interact()?;

    let user = session.signup(users, &email, &password, &name)?;
    msg_success!(Message::SignedUp(user.email.clone()));
    Ok(())
}

pub fn login(args: LoginArgs, users: &mut Users, session: &mut SessionState) -> Result<()> {
    let theme = ColorfulTheme::default();
    let email = match args.email {
        Some(email) => email,
        None => Input::with_theme(&theme).with_prompt(Message::PromptEmail.to_string()).interact_text()?,
    };
    let password = Password::with_theme(&theme)
        .with_prompt(Message::PromptPassword.to_string())
        .interact()?;

    let user = session.login(users, &email, &password)?;
    msg_success!(Message::SignedIn(user.email.clone()));
    Ok(())
}

pub fn logout(users: &mut Users, session: &mut SessionState) -> Result<()> {
    if !session.is_signed_in() {
        msg_info!(Message::NotSignedIn);
        return Ok(());
    }
    session.teardown(users)?;
    msg_success!(Message::SignedOut);
    Ok(())
}

pub fn whoami(session: &SessionState) -> Result<()> {
    match (session.user(), session.started_at()) {
        (Some(user), Some(started_at)) => {
            msg_print!(Message::SignedInAs(user.email.clone(), format_datetime(&started_at)));
        }
        _ => msg_info!(Message::NotSignedIn),
    }
    Ok(())
}
