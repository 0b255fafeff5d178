use crate::session::Session;
use crate::validation::{self, RegistrationForm, ValidationErrors};
use cinetime_client::{ApiError, AuthApi};
use cinetime_models::{PasswordChange, ProfileUpdate, Registration};
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_ROLE: &str = "USER";

#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Backend rejection; `message` is the payload message or the call
    /// site's fallback text
    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },

    #[error("failed to persist credentials: {0}")]
    Storage(anyhow::Error),
}

impl AccountError {
    pub fn api(source: ApiError, fallback: &str) -> Self {
        AccountError::Api {
            message: source.user_message(fallback),
            source,
        }
    }
}

pub async fn register<A: AuthApi + ?Sized>(api: &A, form: &RegistrationForm) -> Result<String, AccountError> {
    validation::registration(form)?;
    let registration = Registration {
        firstname: form.firstname.trim().to_string(),
        lastname: form.lastname.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password.clone(),
        role: DEFAULT_ROLE.to_string(),
    };
    api.register(&registration)
        .await
        .map_err(|e| AccountError::api(e, "Registration failed"))
}

pub async fn verify_otp<A: AuthApi + ?Sized>(api: &A, email: &str, code: &str) -> Result<String, AccountError> {
    validation::otp(code.trim())?;
    api.verify_otp(email.trim(), code.trim())
        .await
        .map_err(|e| AccountError::api(e, "Verification failed"))
}

/// Save trimmed names and mirror them into the session user
pub async fn update_profile<A: AuthApi + ?Sized>(
    session: &Session<A>,
    firstname: &str,
    lastname: &str,
) -> Result<String, AccountError> {
    validation::profile(firstname, lastname)?;
    let profile = ProfileUpdate {
        firstname: firstname.trim().to_string(),
        lastname: lastname.trim().to_string(),
    };
    let message = session
        .api()
        .update_profile(&profile)
        .await
        .map_err(|e| AccountError::api(e, "Failed to update profile"))?;

    if let Some(mut user) = session.current_user() {
        user.firstname = profile.firstname;
        user.lastname = profile.lastname;
        session.set_user(Some(user));
    }
    info!(operation = "update_profile", "Profile updated");
    Ok(message)
}

pub async fn change_password<A: AuthApi + ?Sized>(
    api: &A,
    current: &str,
    new: &str,
    confirm: &str,
) -> Result<String, AccountError> {
    validation::password_change(current, new, confirm)?;
    let change = PasswordChange {
        current_password: current.to_string(),
        new_password: new.to_string(),
    };
    api.change_password(&change)
        .await
        .map_err(|e| AccountError::api(e, "Failed to change password"))
}

/// Delete the account, then end the session
pub async fn delete_account<A: AuthApi + ?Sized>(session: &Session<A>, password: &str) -> Result<String, AccountError> {
    validation::account_deletion(password)?;
    let message = session
        .api()
        .delete_account(password)
        .await
        .map_err(|e| AccountError::api(e, "Failed to delete account"))?;
    warn!(operation = "delete_account", "Account deleted");
    session.logout()?;
    Ok(message)
}

pub async fn request_password_reset<A: AuthApi + ?Sized>(api: &A, email: &str) -> Result<String, AccountError> {
    validation::email(email)?;
    api.request_password_reset(email.trim())
        .await
        .map_err(|e| AccountError::api(e, "Failed to send reset email"))
}

/// Returns the email address the reset token was issued for
pub async fn verify_reset_token<A: AuthApi + ?Sized>(api: &A, token: &str) -> Result<String, AccountError> {
    if token.trim().is_empty() {
        return Err(ValidationErrors(vec!["Invalid reset link".to_string()]).into());
    }
    api.verify_reset_token(token.trim())
        .await
        .map_err(|e| AccountError::api(e, "Invalid or expired reset link"))
}

pub async fn reset_password<A: AuthApi + ?Sized>(
    api: &A,
    token: &str,
    password: &str,
    confirm: &str,
) -> Result<String, AccountError> {
    validation::password_reset(password, confirm)?;
    api.reset_password(token.trim(), password)
        .await
        .map_err(|e| AccountError::api(e, "Failed to reset password"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{user, FakeAuth};
    use cinetime_config::CredentialStore;
    use std::sync::Arc;

    async fn signed_in(dir: &tempfile::TempDir) -> (Arc<FakeAuth>, Session<FakeAuth>) {
        let api = Arc::new(FakeAuth::with_user(user(&["USER"])));
        let mut store = CredentialStore::new(dir.path().join("credentials.toml"));
        store.set_access_token("token".to_string());
        let session = Session::restore(api.clone(), store).await;
        (api, session)
    }

    #[tokio::test]
    async fn test_register_sends_default_role() {
        let api = FakeAuth::default();
        let form = RegistrationForm {
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
        };
        assert_eq!(register(&api, &form).await.unwrap(), "Registration successful");
        assert_eq!(api.calls(), ["register"]);
    }

    #[tokio::test]
    async fn test_invalid_forms_make_no_calls() {
        let api = FakeAuth::default();
        assert!(register(&api, &RegistrationForm::default()).await.is_err());
        assert!(verify_otp(&api, "ada@example.com", "12ab56").await.is_err());
        assert!(change_password(&api, "old", "weak", "weak").await.is_err());
        assert!(request_password_reset(&api, "not-an-email").await.is_err());
        assert!(reset_password(&api, "tok", "Abcdefg1", "Abcdefg2").await.is_err());
        assert!(verify_reset_token(&api, " ").await.is_err());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_profile_refreshes_session_user() {
        let dir = tempfile::tempdir().unwrap();
        let (_api, session) = signed_in(&dir).await;

        update_profile(&session, "  Grace ", "Hopper ").await.unwrap();
        let current = session.current_user().unwrap();
        assert_eq!(current.firstname, "Grace");
        assert_eq!(current.lastname, "Hopper");
    }

    #[tokio::test]
    async fn test_delete_account_logs_out() {
        let dir = tempfile::tempdir().unwrap();
        let (api, session) = signed_in(&dir).await;

        assert!(matches!(delete_account(&session, "").await, Err(AccountError::Validation(_))));
        delete_account(&session, "secret").await.unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(api.attached_token(), None);
    }

    #[tokio::test]
    async fn test_api_errors_use_payload_or_fallback() {
        let api = FakeAuth::default();
        let err = change_password(&api, "wrong", "Abcdefg1", "Abcdefg1").await.unwrap_err();
        assert_eq!(err.to_string(), "Current password is incorrect");

        let err = verify_reset_token(&api, "expired").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid or expired reset link");

        // Server payload message wins over the fallback
        let err = request_password_reset(&api, "ada@example.com").await.unwrap_err();
        assert_eq!(err.to_string(), "boom");

        assert_eq!(verify_reset_token(&api, "good").await.unwrap(), "ada@example.com");
    }
}
