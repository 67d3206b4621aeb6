//! External sign-in providers (Google, Facebook)
//!
//! All provider-specific plumbing lives here: authorization URL building,
//! code-for-token exchange and profile fetch. Handlers only ever see an
//! `ExternalUser`. A provider without configured credentials is disabled.

use serde_json::Value;
use url::Url;

use crate::config::{self, OAuthProvider};
use crate::error::ApiError;

/// Profile returned by a provider after a completed sign-in
#[derive(Debug, Clone)]
pub struct ExternalUser {
    pub email: String,
    pub name: Option<String>,
}

struct ProviderEndpoints {
    authorize_url: &'static str,
    token_url: &'static str,
    userinfo_url: &'static str,
    scope: &'static str,
}

fn endpoints(provider: &str) -> Option<ProviderEndpoints> {
    match provider {
        "google" => Some(ProviderEndpoints {
            authorize_url: "https://accounts.google.com/o/oauth2/v2/auth",
            token_url: "https://oauth2.googleapis.com/token",
            userinfo_url: "https://openidconnect.googleapis.com/v1/userinfo",
            scope: "openid email profile",
        }),
        "facebook" => Some(ProviderEndpoints {
            authorize_url: "https://www.facebook.com/v18.0/dialog/oauth",
            token_url: "https://graph.facebook.com/v18.0/oauth/access_token",
            userinfo_url: "https://graph.facebook.com/me",
            scope: "email public_profile",
        }),
        _ => None,
    }
}

fn provider_config(provider: &str) -> Result<&'static OAuthProvider, ApiError> {
    let oauth = &config::config().oauth;
    let configured = match provider {
        "google" => oauth.google.as_ref(),
        "facebook" => oauth.facebook.as_ref(),
        _ => None,
    };
    configured.ok_or_else(|| {
        ApiError::not_found(format!("Sign-in provider '{}' is not available", provider))
    })
}

fn redirect_uri(provider: &str) -> String {
    format!("{}/signin-{}", config::config().oauth.redirect_base, provider)
}

/// Build the provider's authorization URL for the browser redirect
pub fn authorize_redirect(provider: &str, state: &str) -> Result<String, ApiError> {
    let creds = provider_config(provider)?;
    let eps = endpoints(provider)
        .ok_or_else(|| ApiError::not_found(format!("Unknown sign-in provider '{}'", provider)))?;

    let mut url = Url::parse(eps.authorize_url)
        .map_err(|e| ApiError::internal_server_error(format!("Bad authorize URL: {}", e)))?;
    url.query_pairs_mut()
        .append_pair("client_id", &creds.client_id)
        .append_pair("redirect_uri", &redirect_uri(provider))
        .append_pair("response_type", "code")
        .append_pair("scope", eps.scope)
        .append_pair("state", state);
    Ok(url.to_string())
}

/// Exchange an authorization code for the signed-in user's profile
pub async fn exchange_code(provider: &str, code: &str) -> Result<ExternalUser, ApiError> {
    let creds = provider_config(provider)?;
    let eps = endpoints(provider)
        .ok_or_else(|| ApiError::not_found(format!("Unknown sign-in provider '{}'", provider)))?;

    let client = reqwest::Client::new();

    let token_response: Value = client
        .post(eps.token_url)
        .form(&[
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", &redirect_uri(provider)),
        ])
        .send()
        .await
        .map_err(|e| {
            tracing::error!("Token exchange with {} failed: {}", provider, e);
            ApiError::service_unavailable("External sign-in is temporarily unavailable")
        })?
        .json()
        .await
        .map_err(|e| {
            tracing::error!("Bad token response from {}: {}", provider, e);
            ApiError::service_unavailable("External sign-in is temporarily unavailable")
        })?;

    let access_token = token_response["access_token"].as_str().ok_or_else(|| {
        tracing::warn!("{} rejected the authorization code: {}", provider, token_response);
        ApiError::unauthorized("External provider rejected the sign-in")
    })?;

    fetch_profile(&client, &eps, access_token, provider).await
}

async fn fetch_profile(
    client: &reqwest::Client,
    eps: &ProviderEndpoints,
    access_token: &str,
    provider: &str,
) -> Result<ExternalUser, ApiError> {
    let mut request = client.get(eps.userinfo_url).bearer_auth(access_token);
    if provider == "facebook" {
        // Graph API wants the fields spelled out
        request = request.query(&[("fields", "id,name,email")]);
    }

    let profile: Value = request
        .send()
        .await
        .map_err(|e| {
            tracing::error!("Profile fetch from {} failed: {}", provider, e);
            ApiError::service_unavailable("External sign-in is temporarily unavailable")
        })?
        .json()
        .await
        .map_err(|e| {
            tracing::error!("Bad profile response from {}: {}", provider, e);
            ApiError::service_unavailable("External sign-in is temporarily unavailable")
        })?;

    let email = profile["email"].as_str().ok_or_else(|| {
        // Facebook accounts can hide their email; nothing to key the account on
        ApiError::unauthorized("External provider did not share an email address")
    })?;

    Ok(ExternalUser {
        email: email.to_string(),
        name: profile["name"].as_str().map(|s| s.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_is_not_found() {
        let err = authorize_redirect("github", "state123").unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn unconfigured_provider_is_not_found() {
        // No GOOGLE_CLIENT_ID/SECRET in the test environment
        let err = authorize_redirect("google", "state123").unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
