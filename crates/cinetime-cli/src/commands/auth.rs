use super::prompts::{prompt_password, prompt_string, value_or_prompt};
use super::spinner::Spinner;
use super::{report_account_error, App};
use crate::output::Output;
use cinetime_core::account;
use cinetime_core::validation::RegistrationForm;
use cinetime_models::User;
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn login(app: &App, email: Option<String>, output: &Output) -> Result<()> {
    if let Some(user) = app.session.current_user() {
        output.info(format!("Already logged in as {}", user.email));
        return Ok(());
    }

    let last_email = app.session.last_email();
    let email = value_or_prompt(email, "Email", last_email.as_deref())?;
    let password = prompt_password("Password")?;

    let spinner = Spinner::start("Logging in...");
    let result = app.session.login(&email, &password).await;
    spinner.finish();

    match result {
        Ok(user) => {
            output.success(format!("Welcome back, {}!", user.full_name()));
            output.data(&user);
        }
        Err(e) => report_account_error(output, &e),
    }
    Ok(())
}

pub fn logout(app: &App, output: &Output) -> Result<()> {
    match app.session.logout() {
        Ok(()) => output.success("Logged out"),
        Err(e) => report_account_error(output, &e),
    }
    Ok(())
}

pub fn whoami(app: &App, output: &Output) -> Result<()> {
    match app.session.current_user() {
        Some(user) => print_user(&user, output),
        None => output.render(&json!({ "authenticated": false }), || output.info("Not logged in")),
    }
    Ok(())
}

pub(crate) fn print_user(user: &User, output: &Output) {
    output.render(user, || {
        println!("{}", user.full_name().bold());
        println!("  {} {}", "Email:".dimmed(), user.email);
        if !user.roles.is_empty() {
            println!("  {} {}", "Roles:".dimmed(), user.roles.join(", "));
        }
    });
}

pub async fn register(app: &App, output: &Output) -> Result<()> {
    let form = RegistrationForm {
        firstname: prompt_string("First name", None)?,
        lastname: prompt_string("Last name", None)?,
        email: prompt_string("Email", None)?,
        password: prompt_password("Password")?,
        confirm_password: prompt_password("Confirm password")?,
    };

    let spinner = Spinner::start("Creating account...");
    let result = account::register(app.client.as_ref(), &form).await;
    spinner.finish();

    match result {
        Ok(message) => {
            output.success(message);
            output.info(format!("A verification code was sent to {}", form.email.trim()));
            let code = prompt_string("Verification code (leave empty to verify later)", None)?;
            if code.trim().is_empty() {
                output.info(format!("Run `cinetime verify-otp --email {}` once you have the code", form.email.trim()));
                return Ok(());
            }
            confirm_code(app, form.email.trim(), &code, output).await;
        }
        Err(e) => report_account_error(output, &e),
    }
    Ok(())
}

pub async fn verify_otp(app: &App, email: Option<String>, code: Option<String>, output: &Output) -> Result<()> {
    let last_email = app.session.last_email();
    let email = value_or_prompt(email, "Email", last_email.as_deref())?;
    let code = value_or_prompt(code, "Verification code", None)?;
    confirm_code(app, &email, &code, output).await;
    Ok(())
}

async fn confirm_code(app: &App, email: &str, code: &str, output: &Output) {
    match account::verify_otp(app.client.as_ref(), email, code).await {
        Ok(message) => {
            output.success(message);
            output.info("You can now log in: cinetime login");
        }
        Err(e) => report_account_error(output, &e),
    }
}

pub async fn forgot_password(app: &App, email: Option<String>, output: &Output) -> Result<()> {
    let last_email = app.session.last_email();
    let email = value_or_prompt(email, "Email", last_email.as_deref())?;

    let spinner = Spinner::start("Sending reset email...");
    let result = account::request_password_reset(app.client.as_ref(), &email).await;
    spinner.finish();

    match result {
        Ok(message) => output.success(message),
        Err(e) => report_account_error(output, &e),
    }
    Ok(())
}

/// Check the token first so an expired link fails before any password prompt
pub async fn reset_password(app: &App, token: &str, output: &Output) -> Result<()> {
    let email = match account::verify_reset_token(app.client.as_ref(), token).await {
        Ok(email) => email,
        Err(e) => {
            report_account_error(output, &e);
            return Ok(());
        }
    };
    output.info(format!("Resetting the password for {}", email));

    let password = prompt_password("New password")?;
    let confirm = prompt_password("Confirm new password")?;
    match account::reset_password(app.client.as_ref(), token, &password, &confirm).await {
        Ok(message) => {
            output.success(message);
            output.info("You can now log in with the new password");
        }
        Err(e) => report_account_error(output, &e),
    }
    Ok(())
}
