//! The backend REST API, as seen from the portal.

use crate::errors::RequestError;
use crate::models::{
    AppointmentsResponse, BookingRequest, BookingResponse, ErrorBody, LoginRequest,
    LoginResponse, RegisterRequest, RegisterResponse,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::future::Future;
use tracing::debug;
use url::Url;

pub trait PortalApi: Send + Sync {
    /// Books an appointment and returns its registration key.
    fn book(
        &self,
        request: &BookingRequest,
    ) -> impl Future<Output = Result<String, RequestError>> + Send;

    /// Lists appointments, optionally only those of one user.
    fn appointments(
        &self,
        user_id: Option<&str>,
    ) -> impl Future<Output = Result<AppointmentsResponse, RequestError>> + Send;

    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<LoginResponse, RequestError>> + Send;

    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<(), RequestError>> + Send;

    fn health(&self) -> impl Future<Output = Result<(), RequestError>> + Send;

    /// Address of the QR image the backend renders for a registration key.
    fn qr_code_url(&self, registration_key: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base: Url,
}

impl HttpApi {
    pub fn new(base: Url) -> Self {
        Self {
            client: Client::new(),
            base,
        }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl PortalApi for HttpApi {
    async fn book(&self, request: &BookingRequest) -> Result<String, RequestError> {
        let response = self
            .client
            .post(self.endpoint(&["api", "appointments"]))
            .json(request)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body: BookingResponse = decode_success(response).await?;
        body.registration_key
            .filter(|key| !key.is_empty())
            .ok_or(RequestError::Rejected {
                status,
                message: None,
            })
    }

    async fn appointments(&self, user_id: Option<&str>) -> Result<AppointmentsResponse, RequestError> {
        let mut url = self.endpoint(&["api", "appointments"]);
        if let Some(user_id) = user_id {
            url.query_pairs_mut().append_pair("userId", user_id);
        }
        let response = self.client.get(url).send().await?;
        decode_success(response).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, RequestError> {
        let response = self
            .client
            .post(self.endpoint(&["api", "login"]))
            .json(request)
            .send()
            .await?;
        let status = response.status().as_u16();
        let mut body: LoginResponse = decode_success(response).await?;
        require_success(status, body.success, body.error.take())?;
        Ok(body)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), RequestError> {
        let response = self
            .client
            .post(self.endpoint(&["api", "register"]))
            .json(request)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body: RegisterResponse = decode_success(response).await?;
        require_success(status, body.success, body.error)
    }

    async fn health(&self) -> Result<(), RequestError> {
        let response = self
            .client
            .get(self.endpoint(&["api", "health"]))
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RequestError::Rejected {
                status: status.as_u16(),
                message: None,
            })
        }
    }

    fn qr_code_url(&self, registration_key: &str) -> String {
        let file = format!("{registration_key}.png");
        self.endpoint(&["api", "bookings-qr", file.as_str()]).to_string()
    }
}

/// Decodes a 2xx body as `T`; any other status becomes a rejection carrying
/// the backend's `error` text when it sent one.
/// A 2xx answer can still refuse the request through its `success` flag.
fn require_success(status: u16, success: bool, error: Option<String>) -> Result<(), RequestError> {
    if success {
        Ok(())
    } else {
        Err(RequestError::Rejected {
            status,
            message: error,
        })
    }
}

async fn decode_success<T: DeserializeOwned>(response: Response) -> Result<T, RequestError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    if status.is_success() {
        return serde_json::from_slice(&bytes)
            .map_err(|err| RequestError::Transport(format!("undecodable response: {err}")));
    }

    let body: ErrorBody = serde_json::from_slice(&bytes).map_err(|err| {
        debug!("non-JSON error body with status {status}: {err}");
        RequestError::Transport(format!("undecodable {status} response: {err}"))
    })?;
    Err(RequestError::Rejected {
        status: status.as_u16(),
        message: body.error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qr_code_url_is_built_under_the_backend() {
        let api = HttpApi::new(Url::parse("http://127.0.0.1:5000").unwrap());
        assert_eq!(
            api.qr_code_url("Q7W2E9RT"),
            "http://127.0.0.1:5000/api/bookings-qr/Q7W2E9RT.png"
        );
    }

    #[test]
    fn refused_success_flag_keeps_backend_error() {
        assert!(require_success(200, true, None).is_ok());

        let err = require_success(200, false, Some("Email already registered".into())).unwrap_err();
        assert_eq!(err.user_message("Registration failed. Please try again."), "Email already registered");

        let err = require_success(200, false, None).unwrap_err();
        assert_eq!(err.user_message("Invalid email or password"), "Invalid email or password");
    }

    #[test]
    fn endpoints_keep_a_base_path() {
        let api = HttpApi::new(Url::parse("http://backend.local/portal/").unwrap());
        assert_eq!(
            api.endpoint(&["api", "login"]).as_str(),
            "http://backend.local/portal/api/login"
        );
        assert_eq!(
            api.qr_code_url("A B").as_str(),
            "http://backend.local/portal/api/bookings-qr/A%20B.png"
        );
    }
}
