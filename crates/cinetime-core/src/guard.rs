use cinetime_models::User;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Welcome,
    Register,
    VerifyOtp,
    Login,
    ForgotPassword,
    ResetPassword,
    Dashboard,
    Home,
    Watchlist,
    Profile,
    AiSearch,
}

impl Route {
    pub const ALL: [Route; 11] = [
        Route::Welcome,
        Route::Register,
        Route::VerifyOtp,
        Route::Login,
        Route::ForgotPassword,
        Route::ResetPassword,
        Route::Dashboard,
        Route::Home,
        Route::Watchlist,
        Route::Profile,
        Route::AiSearch,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Welcome => "/",
            Route::Register => "/register",
            Route::VerifyOtp => "/verify-otp",
            Route::Login => "/login",
            Route::ForgotPassword => "/forgot-password",
            Route::ResetPassword => "/reset-password",
            Route::Dashboard => "/dashboard",
            Route::Home => "/home",
            Route::Watchlist => "/watchlist",
            Route::Profile => "/profile",
            Route::AiSearch => "/ai-search",
        }
    }

    /// Resolve a path; `/reset-password/<token>` maps to [`Route::ResetPassword`]
    /// and anything unknown falls back to [`Route::Welcome`].
    pub fn from_path(path: &str) -> Route {
        let trimmed = path.trim_end_matches('/');
        if trimmed.starts_with("/reset-password/") {
            return Route::ResetPassword;
        }
        Route::ALL
            .into_iter()
            .find(|route| route.path().trim_end_matches('/') == trimmed)
            .unwrap_or(Route::Welcome)
    }

    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Route::Welcome
                | Route::Register
                | Route::VerifyOtp
                | Route::Login
                | Route::ForgotPassword
                | Route::ResetPassword
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    LoginRequired,
    Forbidden,
}

/// Decide whether `user` may open `route`. Protected routes need a user and,
/// when `required_roles` is non-empty, at least one of those roles.
pub fn check(route: Route, user: Option<&User>, required_roles: &[&str]) -> Access {
    if route.is_public() {
        return Access::Granted;
    }
    match user {
        None => Access::LoginRequired,
        Some(user) if !required_roles.is_empty() && !user.has_any_role(required_roles) => Access::Forbidden,
        Some(_) => Access::Granted,
    }
}
