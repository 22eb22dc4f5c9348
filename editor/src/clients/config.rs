use std::fmt;
use std::time::Duration;

use secrecy::SecretString;

use crate::config::AppConfig;

/// Configuration for talking to the notes backend
pub struct ApiConfig {
    /// Origin of the backend, e.g. `http://localhost:8000`
    pub base_url: String,
    /// Bearer token sent with every request, if the deployment needs one
    pub access_token: Option<SecretString>,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn from_app_config(config: &AppConfig, access_token: Option<SecretString>) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            access_token,
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}
