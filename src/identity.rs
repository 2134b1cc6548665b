//! Best-effort visitor identity. Nothing here is authenticated: headers can
//! be spoofed and the fallbacks are weak, so ids are only good for counting.

use crate::errors::StoreError;
use crate::storage::KeyValueStorage;
use axum::http::{header::USER_AGENT, HeaderMap};
use chrono::Utc;
use rand::{distr::Alphanumeric, Rng};

pub const CLIENT_ID_KEY: &str = "clientId";

const FORWARDED_FOR: &str = "x-forwarded-for";
const REAL_IP: &str = "x-real-ip";

/// Resolves the requester id from proxy headers, falling back to the user
/// agent plus the current time. The fallback is unique per request, so such
/// visitors can like more than once.
pub fn resolve_client_id(headers: &HeaderMap) -> String {
    if let Some(first) = header_str(headers, FORWARDED_FOR)
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return first.to_string();
    }

    if let Some(real_ip) = header_str(headers, REAL_IP)
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return real_ip.to_string();
    }

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");
    format!("{user_agent}_{}", Utc::now().timestamp_millis())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Returns the token persisted in `storage`, creating and saving one on
/// first use.
pub async fn browser_client_id(storage: &dyn KeyValueStorage) -> Result<String, StoreError> {
    if let Some(existing) = storage.get_item(CLIENT_ID_KEY).await? {
        if !existing.is_empty() {
            return Ok(existing);
        }
    }
    let token = generate_client_token();
    storage.set_item(CLIENT_ID_KEY, token.clone()).await?;
    Ok(token)
}

pub fn generate_client_token() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .map(|byte| (byte as char).to_ascii_lowercase())
        .take(9)
        .collect();
    format!("client_{}_{suffix}", Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use axum::http::HeaderValue;

    #[test]
    fn forwarded_for_takes_first_address() {
        let mut headers = HeaderMap::new();
        headers.insert(
            FORWARDED_FOR,
            HeaderValue::from_static(" 203.0.113.7 , 10.0.0.1"),
        );
        headers.insert(REAL_IP, HeaderValue::from_static("10.0.0.9"));
        assert_eq!(resolve_client_id(&headers), "203.0.113.7");
    }

    #[test]
    fn real_ip_used_without_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(REAL_IP, HeaderValue::from_static("198.51.100.4"));
        assert_eq!(resolve_client_id(&headers), "198.51.100.4");
    }

    #[test]
    fn falls_back_to_user_agent_and_time() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("curl/8.0"));
        let id = resolve_client_id(&headers);
        assert!(id.starts_with("curl/8.0_"));

        let anonymous = resolve_client_id(&HeaderMap::new());
        assert!(anonymous.starts_with("unknown_"));
    }

    #[test]
    fn generated_tokens_have_expected_shape() {
        let token = generate_client_token();
        let parts: Vec<&str> = token.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "client");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn browser_token_is_reused() {
        let storage = MemoryStorage::new();
        let first = browser_client_id(&storage).await.unwrap();
        let second = browser_client_id(&storage).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(
            storage.get_item(CLIENT_ID_KEY).await.unwrap(),
            Some(first)
        );
    }
}
