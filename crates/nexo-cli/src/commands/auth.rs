//! Account commands: register, login, logout, whoami.

use clap::Args;

use nexo_core::error::AppError;
use nexo_service::RegisterRequest;

use crate::context::CliContext;
use crate::output::{self, OutputFormat};
use crate::session::StoredSession;

use super::prompt_error;

/// Arguments for `register`
#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Display name
    #[arg(short, long)]
    pub username: Option<String>,
    /// Sign-in email
    #[arg(short, long)]
    pub email: Option<String>,
    /// Password (prompted when omitted)
    #[arg(long)]
    pub password: Option<String>,
    /// Administrative password (prompted when registration requires it)
    #[arg(long)]
    pub admin_password: Option<String>,
}

/// Arguments for `login`
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Sign-in email
    #[arg(short, long)]
    pub email: Option<String>,
    /// Password (prompted when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

fn input(prompt: &str, given: &Option<String>) -> Result<String, AppError> {
    match given {
        Some(value) => Ok(value.clone()),
        None => dialoguer::Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(prompt_error),
    }
}

/// Create an account. Registration may first require the admin password.
pub async fn register(cli: &CliContext, args: &RegisterArgs) -> Result<(), AppError> {
    let auth = &cli.services.auth;

    let admin_password = if auth.requires_admin_password() {
        let supplied = match &args.admin_password {
            Some(p) => p.clone(),
            None => dialoguer::Password::new()
                .with_prompt("Admin password")
                .interact()
                .map_err(prompt_error)?,
        };
        auth.verify_admin_password(Some(&supplied))?;
        Some(supplied)
    } else {
        None
    };

    let username = input("Username", &args.username)?;
    let email = input("Email", &args.email)?;
    let (password, confirm_password) = match &args.password {
        Some(p) => (p.clone(), p.clone()),
        None => {
            let password = dialoguer::Password::new()
                .with_prompt("Password")
                .interact()
                .map_err(prompt_error)?;
            let confirm = dialoguer::Password::new()
                .with_prompt("Confirm password")
                .interact()
                .map_err(prompt_error)?;
            (password, confirm)
        }
    };

    let profile = auth
        .register(RegisterRequest {
            username,
            email,
            password,
            confirm_password,
            admin_password,
        })
        .await?;

    output::print_success(&format!(
        "Account created for {}. Run `nexo login` to sign in.",
        profile.email
    ));
    Ok(())
}

/// Sign in and persist the session.
pub async fn login(cli: &CliContext, args: &LoginArgs) -> Result<(), AppError> {
    let email = input("Email", &args.email)?;
    let password = match &args.password {
        Some(p) => p.clone(),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(prompt_error)?,
    };

    let session = cli.services.auth.login(&email, &password).await?;
    cli.store.save(&StoredSession::new(session))?;
    output::print_success(&format!("Signed in as {}", email.trim()));
    Ok(())
}

/// Revoke the session and remove it locally.
///
/// The local session is removed even when the backend call fails.
pub async fn logout(cli: &CliContext) -> Result<(), AppError> {
    let Some(stored) = cli.store.load()? else {
        output::print_success("Already signed out");
        return Ok(());
    };
    let revoked = cli.services.auth.logout(&stored.session).await;
    cli.store.clear()?;
    revoked?;
    output::print_success("Signed out");
    Ok(())
}

/// Show the signed-in user.
pub async fn whoami(cli: &CliContext) -> Result<(), AppError> {
    let stored = cli.require_session().await?;
    let ctx = CliContext::session_context(&stored);
    let profile = cli.services.auth.current_user(&ctx).await?;

    match cli.format {
        OutputFormat::Json => output::print_json(&profile),
        OutputFormat::Table => {
            output::print_kv("Username", &profile.username);
            output::print_kv("Email", &profile.email);
            output::print_kv("ID", &profile.id.to_string());
        }
    }
    Ok(())
}
