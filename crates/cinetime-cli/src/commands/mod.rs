pub mod auth;
pub mod browse;
pub mod chat;
pub mod config;
pub mod episodes;
pub mod profile;
pub mod prompts;
pub mod report;
pub mod spinner;
pub mod watchlist;

use crate::output::Output;
use cinetime_client::{ApiError, CinetimeClient};
use cinetime_config::{Config, CredentialStore, PathManager};
use cinetime_core::guard::{self, Access, Route};
use cinetime_core::{AccountError, Session};
use cinetime_models::User;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything a command needs: configuration, the shared client and the
/// restored session
pub struct App {
    pub config: Config,
    pub paths: PathManager,
    pub client: Arc<CinetimeClient>,
    pub session: Session<CinetimeClient>,
}

impl App {
    pub async fn connect(config: Config, paths: PathManager) -> Result<Self> {
        let client = Arc::new(
            CinetimeClient::from_config(&config.api).map_err(|e| eyre!("Failed to build HTTP client: {}", e))?,
        );

        let mut store = CredentialStore::new(paths.credentials_file());
        if let Err(e) = store.load() {
            warn!(operation = "load_credentials", error = %e, path = %store.path().display(), "Ignoring unreadable credentials file");
        }
        let session = Session::restore(Arc::clone(&client), store).await;
        debug!(operation = "connect", base_url = %config.api.base_url, authenticated = session.is_authenticated(), "Client ready");

        Ok(Self {
            config,
            paths,
            client,
            session,
        })
    }

    /// Apply the route guard. Prints the refusal and returns `None` when the
    /// command may not run.
    pub fn require(&self, route: Route, output: &Output) -> Option<User> {
        let user = self.session.current_user();
        match guard::check(route, user.as_ref(), &[]) {
            Access::Granted => user,
            Access::LoginRequired => {
                output.error("Please log in first: cinetime login");
                None
            }
            Access::Forbidden => {
                output.error(format!("You do not have access to {}", route));
                None
            }
        }
    }
}

/// Print an account failure inline: one line per validation message,
/// otherwise the backend or fallback message
pub fn report_account_error(output: &Output, err: &AccountError) {
    match err {
        AccountError::Validation(errors) => output.errors(errors.messages()),
        other => output.error(other.to_string()),
    }
}

pub fn report_api_error(output: &Output, err: &ApiError, fallback: &str) {
    debug!(operation = "command", error = %err, "Backend call failed");
    output.error(err.user_message(fallback));
}
