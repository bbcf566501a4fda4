//! OpenStack client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpenStackError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned {status}: {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("No {service} endpoint configured for region '{region}'")]
    MissingEndpoint {
        service: &'static str,
        region: String,
    },

    #[error("No token configured. Set OS_TOKEN or token/token-env in the provider block")]
    MissingToken,

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<OpenStackError> for floatlink_cloud::CloudError {
    fn from(err: OpenStackError) -> Self {
        match err {
            OpenStackError::Api {
                service,
                status,
                message,
            } => floatlink_cloud::CloudError::remote(
                Some(status),
                format!("{} ({}): {}", service, status, message),
            ),
            OpenStackError::Http(e) => {
                floatlink_cloud::CloudError::remote(e.status().map(|s| s.as_u16()), e.to_string())
            }
            e @ (OpenStackError::MissingEndpoint { .. }
            | OpenStackError::MissingToken
            | OpenStackError::InvalidEndpoint(_)) => {
                floatlink_cloud::CloudError::InvalidConfig(e.to_string())
            }
            OpenStackError::JsonError(e) => floatlink_cloud::CloudError::remote(None, e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, OpenStackError>;
