use crate::error::ApiError;
use crate::http::{ApiClient, Envelope};
use cinetime_models::{AuthTokens, PasswordChange, ProfileUpdate, Registration, User};
use serde_json::json;
use tracing::{debug, info};

/// Register a new account. The backend answers with a message and mails an OTP.
pub async fn register(client: &ApiClient, registration: &Registration) -> Result<String, ApiError> {
    let response: Envelope<serde_json::Value> = client.post_json("/auth/register", Some(registration)).await?;
    info!(operation = "register", email = %registration.email, "Registration submitted");
    Ok(response.message_or("Registration successful"))
}

pub async fn verify_otp(client: &ApiClient, email: &str, otp: &str) -> Result<String, ApiError> {
    let body = json!({ "email": email, "otp": otp });
    let response: Envelope<serde_json::Value> = client.post_json("/auth/verify-otp", Some(&body)).await?;
    Ok(response.message_or("Account verified"))
}

pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<AuthTokens, ApiError> {
    let body = json!({ "email": email, "password": password });
    let response: Envelope<AuthTokens> = client.post_json("/auth/login", Some(&body)).await?;
    debug!(operation = "login", email, "Login accepted");
    response.into_data("login tokens")
}

/// Current user for the attached bearer token
pub async fn me(client: &ApiClient) -> Result<User, ApiError> {
    let response: Envelope<User> = client.get_json("/auth/me", &[]).await?;
    response.into_data("user details")
}

pub async fn update_profile(client: &ApiClient, profile: &ProfileUpdate) -> Result<String, ApiError> {
    let response: Envelope<serde_json::Value> = client.put_json("/auth/profile", profile).await?;
    Ok(response.message_or("Profile updated"))
}

pub async fn change_password(client: &ApiClient, change: &PasswordChange) -> Result<String, ApiError> {
    let response: Envelope<serde_json::Value> = client.put_json("/auth/change-password", change).await?;
    Ok(response.message_or("Password changed"))
}

pub async fn delete_account(client: &ApiClient, password: &str) -> Result<String, ApiError> {
    let body = json!({ "password": password });
    let response: Option<Envelope<serde_json::Value>> = client.delete_json("/auth/account", Some(&body)).await?;
    Ok(response.map(|r| r.message_or("Account deleted")).unwrap_or_else(|| "Account deleted".to_string()))
}
