// Redfish HTTP client
//
// Wraps `reqwest::Client` with iLO URL construction and Basic auth.
// One GET per call, no retries: retry policy belongs to the caller.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::redfish::models::Thermal;
use crate::transport::TransportConfig;

/// Path of the chassis thermal resource on single-chassis iLO systems.
pub const THERMAL_PATH: &str = "redfish/v1/chassis/1/Thermal";

/// Raw HTTP client for the controller's Redfish API.
pub struct RedfishClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: SecretString,
    timeout_secs: u64,
}

impl RedfishClient {
    /// Create a client for `https://{host}` from resolved credentials.
    ///
    /// Builds a dedicated `reqwest::Client`, so the TLS policy in
    /// `transport` applies to this client only.
    pub fn new(credentials: &Credentials, transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("https://{}/", credentials.host))?;
        Self::with_base_url(credentials, base_url, transport)
    }

    /// Create a client against an explicit base URL (reverse proxies, plain
    /// HTTP emulators).
    pub fn with_base_url(
        credentials: &Credentials,
        base_url: Url,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            username: credentials.username.clone(),
            password: credentials.password.clone(),
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, credentials: &Credentials) -> Self {
        Self {
            http,
            base_url,
            username: credentials.username.clone(),
            password: credentials.password.clone(),
            timeout_secs: 0,
        }
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the chassis thermal resource (fans + temperatures).
    ///
    /// `GET /redfish/v1/chassis/1/Thermal`
    pub async fn thermal(&self) -> Result<Thermal, Error> {
        let url = self.url(THERMAL_PATH)?;
        self.get(url).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Send an authenticated GET and decode the JSON body.
    ///
    /// Non-success statuses fail before the body is read.
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|e| self.map_transport(e))?;
        trace!(bytes = body.len(), "received Redfish body");

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    fn map_transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_https_url_from_host() {
        let creds = Credentials::new("ilo.lan:8443", "admin", SecretString::from(String::new()));
        let client = RedfishClient::new(&creds, &TransportConfig::default()).expect("client");
        assert_eq!(client.base_url().as_str(), "https://ilo.lan:8443/");
        assert_eq!(
            client.url(THERMAL_PATH).expect("url").as_str(),
            "https://ilo.lan:8443/redfish/v1/chassis/1/Thermal"
        );
    }
}
