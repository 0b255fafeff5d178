use super::segment;
use crate::error::ApiError;
use crate::http::{ApiClient, Envelope};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct VerifyTokenResponse {
    email: Option<String>,
    data: Option<VerifyTokenData>,
}

#[derive(Debug, Deserialize)]
struct VerifyTokenData {
    email: String,
}

pub async fn request_reset(client: &ApiClient, email: &str) -> Result<String, ApiError> {
    let body = json!({ "email": email });
    let response: Envelope<serde_json::Value> = client.post_json("/password/request", Some(&body)).await?;
    Ok(response.message_or("Password reset instructions sent"))
}

/// Check a reset token; returns the email address it was issued for
pub async fn verify_token(client: &ApiClient, token: &str) -> Result<String, ApiError> {
    let path = format!("/password/verify/{}", segment(token));
    let response: VerifyTokenResponse = client.get_json(&path, &[]).await?;
    response
        .email
        .or(response.data.map(|d| d.email))
        .ok_or(ApiError::MissingData("reset token email"))
}

pub async fn reset(client: &ApiClient, token: &str, password: &str) -> Result<String, ApiError> {
    let path = format!("/password/reset/{}", segment(token));
    let body = json!({ "password": password });
    let response: Envelope<serde_json::Value> = client.post_json(&path, Some(&body)).await?;
    Ok(response.message_or("Password reset successful"))
}
