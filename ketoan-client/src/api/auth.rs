use std::sync::Arc;

use serde_json::Value;
use shared::client::{
    AuthResponse, ForgotPasswordRequest, IsLoginResponse, LoginRequest, RefreshResponse,
    RegisterRequest, ResetPasswordRequest, VerifyOtpRequest,
};
use shared::response::MessageResponse;

use crate::error::{ClientError, ClientResult};
use crate::http::{ApiRequest, HttpClient, decode};
use crate::session::EndReason;

/// `/auth/*` endpoints
#[derive(Debug)]
pub struct AuthApi<C> {
    client: Arc<C>,
}

impl<C> Clone for AuthApi<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<C: HttpClient> AuthApi<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Sign in and persist the returned session
    pub async fn login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> ClientResult<AuthResponse> {
        let body = LoginRequest {
            email: email.into(),
            password: password.into(),
        };
        let request = ApiRequest::post("/auth/login").with_body(&body)?.anonymous();
        let auth: AuthResponse = decode(self.client.send_json(request).await?)?;
        self.client.session().establish(&auth)?;
        Ok(auth)
    }

    /// Create an account and persist the returned session
    pub async fn register(&self, body: &RegisterRequest) -> ClientResult<AuthResponse> {
        let request = ApiRequest::post("/auth/register").with_body(body)?.anonymous();
        let auth: AuthResponse = decode(self.client.send_json(request).await?)?;
        self.client.session().establish(&auth)?;
        Ok(auth)
    }

    /// Sign out.
    ///
    /// The local session is cleared even when the server call fails; the
    /// server error is still returned.
    pub async fn logout(&self) -> ClientResult<()> {
        let result = self.client.send_json(ApiRequest::get("/auth/logout")).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Logout request failed, clearing local session anyway");
        }
        let cleared = self.client.session().end(EndReason::LoggedOut);
        result?;
        cleared
    }

    /// Ask the server whether the session is still valid. Errors count as
    /// signed out.
    pub async fn is_authenticated(&self) -> bool {
        let response = match self.client.send_json(ApiRequest::get("/auth/is-login")).await {
            Ok(value) => decode::<IsLoginResponse>(value),
            Err(e) => Err(e),
        };
        match response {
            Ok(body) => body.is_authenticated,
            Err(e) => {
                tracing::debug!(error = %e, "Session check failed");
                false
            }
        }
    }

    /// Explicit token refresh through the pipeline. Persists and returns the
    /// new access token.
    pub async fn refresh_token(&self) -> ClientResult<String> {
        let body: RefreshResponse =
            decode(self.client.send_json(ApiRequest::post("/auth/refresh")).await?)?;
        let token = body
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ClientError::InvalidResponse("refresh returned no access token".into()))?;
        self.client.session().replace_token(token.clone())?;
        Ok(token)
    }

    /// Confirm an email address with the token from the verification mail
    pub async fn verify_email(&self, token: &str) -> ClientResult<()> {
        let request = ApiRequest::get("/auth/verify-email")
            .with_query(vec![("token".to_string(), token.to_string())])
            .anonymous();
        self.client.send_json(request).await?;
        Ok(())
    }

    /// Send a password-reset OTP to `email`
    pub async fn forgot_password(&self, email: impl Into<String>) -> ClientResult<MessageResponse> {
        let body = ForgotPasswordRequest {
            email: email.into(),
        };
        self.post_message("/auth/forgot-password", &body).await
    }

    pub async fn verify_otp(
        &self,
        email: impl Into<String>,
        otp: impl Into<String>,
    ) -> ClientResult<MessageResponse> {
        let body = VerifyOtpRequest {
            email: email.into(),
            otp: otp.into(),
        };
        self.post_message("/auth/verify-otp", &body).await
    }

    pub async fn change_password_with_otp(
        &self,
        body: &ResetPasswordRequest,
    ) -> ClientResult<MessageResponse> {
        self.post_message("/auth/change-pw-otp", body).await
    }

    /// Google OAuth entry point. The caller opens it in a browser.
    pub fn google_login_url(&self) -> String {
        format!("{}/auth/google", self.client.base_url())
    }

    async fn post_message<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<MessageResponse> {
        let request = ApiRequest::post(path).with_body(body)?.anonymous();
        match self.client.send_json(request).await? {
            Value::Null => Ok(MessageResponse::default()),
            value => decode(value),
        }
    }
}
