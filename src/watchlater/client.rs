use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;

pub const DEFAULT_API_BASE: &str = "https://api.bilibili.com";
const TOVIEW_ADD_PATH: &str = "/x/v2/history/toview/add";

/// The single mutating call this tool makes.
#[async_trait]
pub trait WatchLaterApi: Send + Sync {
    async fn add(&self, aid: u64, csrf: &str) -> Result<(), ToviewError>;
}

#[derive(Clone)]
pub struct BiliClient {
    http: HttpClient,
    base_url: String,
}

impl BiliClient {
    /// `http` should already carry the user's cookie (see `crate::http`).
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), TOVIEW_ADD_PATH)
    }

    /// urlencoded `aid=…&csrf=…` POST to the toview endpoint.
    fn build_request(&self, aid: u64, csrf: &str) -> Result<reqwest::Request, reqwest::Error> {
        let form = [("aid", aid.to_string()), ("csrf", csrf.to_string())];
        self.http.post(self.endpoint()).form(&form).build()
    }
}

#[async_trait]
impl WatchLaterApi for BiliClient {
    async fn add(&self, aid: u64, csrf: &str) -> Result<(), ToviewError> {
        let request = self.build_request(aid, csrf).map_err(ToviewError::from_reqwest)?;
        let response = self
            .http
            .execute(request)
            .await
            .map_err(ToviewError::from_reqwest)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(ToviewError::from_reqwest)?;
        check_response(status, &bytes)
    }
}

/// `{"code": 0, ...}` is success; everything else is a failure for this aid.
fn check_response(status: StatusCode, body: &[u8]) -> Result<(), ToviewError> {
    let parsed: ApiResponse = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(_) if !status.is_success() => return Err(ToviewError::Status(status)),
        Err(e) => return Err(ToviewError::Decode(e)),
    };
    if parsed.code != 0 {
        return Err(ToviewError::Api {
            code: parsed.code,
            message: parsed.message.unwrap_or_default(),
        });
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    code: i64,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug)]
pub enum ToviewError {
    Http(reqwest::Error),
    Timeout,
    Status(StatusCode),
    Api { code: i64, message: String },
    Decode(serde_json::Error),
    #[cfg(test)]
    MockQueueEmpty,
}

impl ToviewError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() { ToviewError::Timeout } else { ToviewError::Http(err) }
    }
}

impl std::fmt::Display for ToviewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToviewError::Http(err) => write!(f, "http error: {err}"),
            ToviewError::Timeout => write!(f, "request timed out"),
            ToviewError::Status(status) => write!(f, "unexpected status {status}"),
            ToviewError::Api { code, message } if message.is_empty() => write!(f, "api error code {code}"),
            ToviewError::Api { code, message } => write!(f, "api error code {code}: {message}"),
            ToviewError::Decode(err) => write!(f, "decode error: {err}"),
            #[cfg(test)]
            ToviewError::MockQueueEmpty => write!(f, "mock api response queue is empty"),
        }
    }
}

impl std::error::Error for ToviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToviewError::Http(err) => Some(err),
            ToviewError::Decode(err) => Some(err),
            _ => None,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_zero_is_success() {
        assert!(check_response(StatusCode::OK, br#"{"code":0,"message":"0","ttl":1}"#).is_ok());
    }

    #[test]
    fn non_zero_code_is_api_error() {
        let err = check_response(StatusCode::OK, br#"{"code":-111,"message":"csrf check failed"}"#).unwrap_err();
        assert!(matches!(err, ToviewError::Api { code: -111, .. }));
        assert!(err.to_string().contains("-111"));
    }

    #[test]
    fn garbage_body_is_decode_error() {
        let err = check_response(StatusCode::OK, b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, ToviewError::Decode(_)));
        let err = check_response(StatusCode::BAD_GATEWAY, b"").unwrap_err();
        assert!(matches!(err, ToviewError::Status(StatusCode::BAD_GATEWAY)));
    }

    #[test]
    fn endpoint_joins_base() {
        let c = BiliClient::new(HttpClient::new(), "http://127.0.0.1:9000/");
        assert_eq!(c.endpoint(), "http://127.0.0.1:9000/x/v2/history/toview/add");
    }

    #[test]
    fn add_request_is_urlencoded_form() {
        let c = BiliClient::new(HttpClient::new(), DEFAULT_API_BASE);
        let req = c.build_request(170001, "tok+/=").unwrap();
        assert_eq!(req.method(), &reqwest::Method::POST);
        assert_eq!(req.url().as_str(), "https://api.bilibili.com/x/v2/history/toview/add");
        assert_eq!(
            req.headers().get(reqwest::header::CONTENT_TYPE).unwrap(),
            "application/x-www-form-urlencoded"
        );
        let body = req.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, b"aid=170001&csrf=tok%2B%2F%3D");
    }
}
