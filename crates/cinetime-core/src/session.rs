use crate::account::AccountError;
use crate::validation;
use cinetime_client::AuthApi;
use cinetime_config::CredentialStore;
use cinetime_models::User;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use tracing::{debug, info, warn};

/// The signed-in user and the tokens backing it.
///
/// Created once with [`Session::restore`] and passed explicitly to whatever
/// needs the current user. Only the session writes the user.
pub struct Session<A: AuthApi + ?Sized> {
    api: Arc<A>,
    store: Mutex<CredentialStore>,
    user: RwLock<Option<User>>,
}

impl<A: AuthApi + ?Sized> Session<A> {
    /// Attach a persisted access token, if any, and try to load the user.
    ///
    /// A rejected token is cleared from the store. Any other failure keeps the
    /// token and leaves the session anonymous.
    pub async fn restore(api: Arc<A>, store: CredentialStore) -> Self {
        let token = store.get_access_token().cloned();
        let session = Self {
            api,
            store: Mutex::new(store),
            user: RwLock::new(None),
        };

        let Some(token) = token else {
            debug!(operation = "session_restore", "No stored token");
            return session;
        };

        session.api.set_access_token(Some(token));
        match session.api.current_user().await {
            Ok(user) => {
                info!(operation = "session_restore", email = %user.email, "Session restored");
                session.set_user(Some(user));
            }
            Err(e) if e.is_unauthorized() => {
                warn!(operation = "session_restore", "Stored token rejected, clearing it");
                session.api.set_access_token(None);
                if let Err(e) = session.clear_stored_tokens() {
                    warn!(operation = "session_restore", error = %e, "Failed to clear stored tokens");
                }
            }
            Err(e) => {
                warn!(operation = "session_restore", error = %e, "Could not load current user");
            }
        }
        session
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn api_handle(&self) -> Arc<A> {
        Arc::clone(&self.api)
    }

    pub fn current_user(&self) -> Option<User> {
        match self.user.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    pub fn last_email(&self) -> Option<String> {
        self.store().get_last_email().cloned()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, AccountError> {
        validation::login(email, password)?;
        let email = email.trim();

        let tokens = self
            .api
            .login(email, password)
            .await
            .map_err(|e| AccountError::api(e, "Login failed"))?;

        {
            let mut store = self.store();
            store.set_access_token(tokens.access_token.clone());
            store.set_refresh_token(tokens.refresh_token);
            store.set_last_email(email.to_string());
            store.save().map_err(AccountError::Storage)?;
        }
        self.api.set_access_token(Some(tokens.access_token));

        let user = self
            .api
            .current_user()
            .await
            .map_err(|e| AccountError::api(e, "Login failed"))?;
        info!(operation = "login", email = %user.email, "Logged in");
        self.set_user(Some(user.clone()));
        Ok(user)
    }

    /// Forget the user, detach the bearer token and drop the stored tokens
    pub fn logout(&self) -> Result<(), AccountError> {
        self.api.set_access_token(None);
        self.set_user(None);
        self.clear_stored_tokens().map_err(AccountError::Storage)?;
        info!(operation = "logout", "Logged out");
        Ok(())
    }

    /// Re-read the user from the backend, e.g. after a profile change
    pub async fn refresh_user(&self) -> Result<User, AccountError> {
        let user = self
            .api
            .current_user()
            .await
            .map_err(|e| AccountError::api(e, "Failed to load user"))?;
        self.set_user(Some(user.clone()));
        Ok(user)
    }

    pub(crate) fn set_user(&self, user: Option<User>) {
        match self.user.write() {
            Ok(mut guard) => *guard = user,
            Err(poisoned) => *poisoned.into_inner() = user,
        }
    }

    fn store(&self) -> MutexGuard<'_, CredentialStore> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn clear_stored_tokens(&self) -> anyhow::Result<()> {
        let mut store = self.store();
        store.clear_tokens();
        store.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{user, FakeAuth};
    use std::sync::atomic::Ordering;

    fn store_with_token(dir: &tempfile::TempDir) -> CredentialStore {
        let mut store = CredentialStore::new(dir.path().join("credentials.toml"));
        store.set_access_token("stale".to_string());
        store.set_refresh_token(Some("stale-refresh".to_string()));
        store.save().unwrap();
        store
    }

    fn reload(dir: &tempfile::TempDir) -> CredentialStore {
        let mut store = CredentialStore::new(dir.path().join("credentials.toml"));
        store.load().unwrap();
        store
    }

    #[tokio::test]
    async fn test_restore_with_valid_token() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeAuth::with_user(user(&["USER"])));
        let session = Session::restore(api.clone(), store_with_token(&dir)).await;

        assert!(session.is_authenticated());
        assert_eq!(api.attached_token().as_deref(), Some("stale"));
    }

    #[tokio::test]
    async fn test_restore_with_rejected_token_clears_store() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeAuth::with_user(user(&["USER"])));
        api.reject_token.store(true, Ordering::SeqCst);

        let session = Session::restore(api.clone(), store_with_token(&dir)).await;

        assert!(!session.is_authenticated());
        assert_eq!(api.attached_token(), None);
        assert_eq!(reload(&dir).get_access_token(), None);
    }

    #[tokio::test]
    async fn test_restore_keeps_token_on_other_failures() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeAuth::with_user(user(&["USER"])));
        api.fail_me.store(true, Ordering::SeqCst);

        let session = Session::restore(api.clone(), store_with_token(&dir)).await;

        assert!(!session.is_authenticated());
        assert_eq!(reload(&dir).get_access_token(), Some(&"stale".to_string()));
    }

    #[tokio::test]
    async fn test_restore_without_token_makes_no_call() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeAuth::with_user(user(&["USER"])));
        let store = CredentialStore::new(dir.path().join("credentials.toml"));
        let session = Session::restore(api.clone(), store).await;

        assert!(!session.is_authenticated());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_login_persists_tokens_and_logout_clears_them() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeAuth::with_user(user(&["USER"])));
        let store = CredentialStore::new(dir.path().join("credentials.toml"));
        let session = Session::restore(api.clone(), store).await;

        let logged_in = session.login(" ada@example.com ", "secret").await.unwrap();
        assert_eq!(logged_in.email, "ada@example.com");
        assert_eq!(api.attached_token().as_deref(), Some("access-1"));
        let stored = reload(&dir);
        assert_eq!(stored.get_access_token(), Some(&"access-1".to_string()));
        assert_eq!(stored.get_last_email(), Some(&"ada@example.com".to_string()));

        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(api.attached_token(), None);
        assert_eq!(reload(&dir).get_access_token(), None);
    }

    #[tokio::test]
    async fn test_login_validation_blocks_call() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeAuth::default());
        let session = Session::restore(api.clone(), CredentialStore::new(dir.path().join("c.toml"))).await;

        let err = session.login("", "").await.unwrap_err();
        assert_eq!(err.to_string(), "Please fill all fields");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_payload_message() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeAuth::with_user(user(&[])));
        let session = Session::restore(api, CredentialStore::new(dir.path().join("c.toml"))).await;

        let err = session.login("ada@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(!session.is_authenticated());
    }
}
