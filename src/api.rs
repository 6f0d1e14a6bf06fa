use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::config;
use crate::models::QueryConfig;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Banner text for the user. Reachability problems get a remediation
    /// hint; everything else gets the generic retry message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(_) => "Could not reach the stats API. Check your network \
                 connection, or ask the API administrator to whitelist this origin."
                .to_string(),
            ApiError::Status(_) | ApiError::Decode(_) => {
                "Failed to load affiliate data. Please try again.".to_string()
            }
        }
    }
}

pub fn query_params(config: &QueryConfig) -> Vec<(&'static str, String)> {
    vec![
        ("codes", config.affiliate_code.clone()),
        ("startDate", config.date_start.clone()),
        ("endDate", config.date_end.clone()),
    ]
}

pub async fn fetch_affiliate_stats(
    client: &reqwest::Client,
    config: &QueryConfig,
) -> Result<Value, ApiError> {
    let response = client
        .get(config::API_URL)
        .query(&query_params(config))
        .header("x-api-key", &config.credential)
        .send()
        .await?;

    let status = response.status();
    let bytes = response.bytes().await?;
    if !status.is_success() {
        return Err(ApiError::Status(status));
    }

    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> QueryConfig {
        QueryConfig {
            affiliate_code: "Colby".to_string(),
            date_start: "2025-10-01".to_string(),
            date_end: "2025-10-31".to_string(),
            credential: "secret".to_string(),
        }
    }

    #[test]
    fn query_params_carry_the_window() {
        let params = query_params(&test_config());
        assert_eq!(
            params,
            vec![
                ("codes", "Colby".to_string()),
                ("startDate", "2025-10-01".to_string()),
                ("endDate", "2025-10-31".to_string()),
            ]
        );
    }

    #[test]
    fn http_errors_get_the_generic_message() {
        let error = ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            error.user_message(),
            "Failed to load affiliate data. Please try again."
        );
    }

    #[test]
    fn decode_errors_get_the_generic_message() {
        let decode_failure = serde_json::from_str::<Value>("{not json").unwrap_err();
        let error = ApiError::from(decode_failure);
        assert!(error.user_message().contains("Please try again"));
    }
}
