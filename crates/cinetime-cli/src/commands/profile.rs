use super::auth::print_user;
use super::prompts::{confirm, prompt_password, value_or_prompt};
use super::{report_account_error, App};
use crate::output::Output;
use crate::ProfileCommands;
use cinetime_core::account;
use cinetime_core::Route;
use color_eyre::Result;

pub async fn run(app: &App, cmd: ProfileCommands, output: &Output) -> Result<()> {
    let Some(user) = app.require(Route::Profile, output) else {
        return Ok(());
    };

    match cmd {
        ProfileCommands::Show => print_user(&user, output),
        ProfileCommands::Update { firstname, lastname } => {
            let firstname = value_or_prompt(firstname, "First name", Some(user.firstname.as_str()))?;
            let lastname = value_or_prompt(lastname, "Last name", Some(user.lastname.as_str()))?;
            match account::update_profile(&app.session, &firstname, &lastname).await {
                Ok(message) => {
                    output.success(message);
                    if let Some(updated) = app.session.current_user() {
                        output.data(&updated);
                    }
                }
                Err(e) => report_account_error(output, &e),
            }
        }
        ProfileCommands::Password => {
            let current = prompt_password("Current password")?;
            let new = prompt_password("New password")?;
            let confirm_new = prompt_password("Confirm new password")?;
            match account::change_password(app.client.as_ref(), &current, &new, &confirm_new).await {
                Ok(message) => output.success(message),
                Err(e) => report_account_error(output, &e),
            }
        }
        ProfileCommands::Delete => {
            output.warn("Deleting your account removes your watchlist and history permanently");
            if !confirm("Delete your account?", false)? {
                output.info("Account kept");
                return Ok(());
            }
            let password = prompt_password("Password")?;
            match account::delete_account(&app.session, &password).await {
                Ok(message) => output.success(message),
                Err(e) => report_account_error(output, &e),
            }
        }
    }
    Ok(())
}
