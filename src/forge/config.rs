//! Configuration for the remote forge connection.
use secrecy::SecretString;

/// Remote repository connection configuration for authenticating and
/// interacting with the forge.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Remote forge host (e.g., "github.com").
    pub host: String,
    /// URL scheme (http or https).
    pub scheme: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Access token for authentication.
    pub token: SecretString,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: "".to_string(),
            scheme: "".to_string(),
            owner: "".to_string(),
            repo: "".to_string(),
            token: SecretString::from("".to_string()),
        }
    }
}

impl RemoteConfig {
    /// Base URI of the REST API for this host.
    pub fn api_base_uri(&self) -> String {
        if self.host == "github.com" {
            format!("{}://api.{}", self.scheme, self.host)
        } else {
            // GitHub Enterprise serves the API under /api/v3
            format!("{}://{}/api/v3", self.scheme, self.host)
        }
    }
}
