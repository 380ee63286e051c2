//! Executes plain-data requests over the network with reqwest.
//!
//! This is the only module in the crate that performs I/O. Status codes are
//! never treated as errors here; a 4xx/5xx comes back as an `HttpResponse`
//! and `ApiClient::parse_response` decides what it means.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

pub(crate) async fn execute(
    http: &reqwest::Client,
    request: HttpRequest,
    timeout: Option<Duration>,
) -> Result<HttpResponse, ApiError> {
    let headers = header_map(&request.headers)?;

    let mut builder = http
        .request(request.method.into(), request.url.as_str())
        .headers(headers);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(body) = request.body {
        builder = builder.body(body);
    }

    let response = builder.send().await.inspect_err(|err| {
        tracing::warn!(url = %request.url, error = %err, "request failed before a response arrived");
    })?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = response.text().await?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, ApiError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let invalid = || ApiError::InvalidHeader { name: name.clone() };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_map_accepts_custom_headers() {
        let map = header_map(&[
            ("Content-Type".to_string(), "application/json".to_string()),
            ("X-Request-Source".to_string(), "tests".to_string()),
        ])
        .unwrap();
        assert_eq!(map.get("content-type").unwrap(), "application/json");
        assert_eq!(map.get("x-request-source").unwrap(), "tests");
    }

    #[test]
    fn header_map_rejects_bad_name() {
        let err = header_map(&[("bad header".to_string(), "v".to_string())]).unwrap_err();
        assert!(matches!(err, ApiError::InvalidHeader { ref name } if name == "bad header"));
    }

    #[test]
    fn header_map_rejects_bad_value() {
        let err = header_map(&[("X-Line".to_string(), "a\nb".to_string())]).unwrap_err();
        assert!(matches!(err, ApiError::InvalidHeader { .. }));
    }
}
