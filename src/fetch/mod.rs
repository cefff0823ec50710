//! Fetch pipeline.
//!
//! This module performs one HTTP exchange through an [`HttpClient`] and
//! turns the response into a [`Response`]:
//! - Request validation and header/body construction
//! - Execution, with redirects and cookies handled by the client
//! - Body read, MIME sniffing, classification and charset decoding

mod request;
mod response;

pub use request::{Method, Request};
pub use response::{Response, ResponseTiming};

use std::time::Instant;

use log::{debug, info, warn};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Url;
use tokio_util::sync::CancellationToken;

use crate::config::FetchConfig;
use crate::content::sniff_prefix;
use crate::error_handling::{categorize_reqwest_error, FetchError};
use crate::initialization::HttpClient;
use request::{build_headers, form_body};
use response::{decode_body, extract_cookies, read_body};

/// Fetches `request` through `client` with the default [`FetchConfig`].
///
/// # Errors
///
/// See [`fetch_with_config`].
pub async fn fetch(request: &Request, client: &HttpClient) -> Result<Response, FetchError> {
    fetch_with_config(
        request,
        client,
        &FetchConfig::default(),
        &CancellationToken::new(),
    )
    .await
}

/// Fetches `request` through `client`.
///
/// Non-2xx statuses are successful fetches; only failures to obtain or read a
/// response are errors. The request's `timeout` bounds the whole pipeline and
/// `cancel` aborts it at any await point.
///
/// # Errors
///
/// - `FetchError::InvalidUrl` / `FetchError::InvalidHeader` before anything is sent
/// - `FetchError::Transport` when the engine fails (DNS, connect, TLS, redirects)
/// - `FetchError::BodyTooLarge` when the body exceeds `config.max_body_size`
/// - `FetchError::Decode` when the text contained malformed sequences; the
///   lossily decoded response is carried by the error
/// - `FetchError::Timeout` / `FetchError::Cancelled`
pub async fn fetch_with_config(
    request: &Request,
    client: &HttpClient,
    config: &FetchConfig,
    cancel: &CancellationToken,
) -> Result<Response, FetchError> {
    let url = validate_url(&request.url)?;
    let headers = build_headers(request, config)?;
    let body = form_body(request);

    let exchange = execute(request.method, url, headers, body, client, config);
    let bounded = async {
        match request.timeout {
            Some(deadline) => match tokio::time::timeout(deadline, exchange).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout {
                    url: request.url.clone(),
                    deadline,
                }),
            },
            None => exchange.await,
        }
    };

    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(FetchError::Cancelled {
            url: request.url.clone(),
        }),
        result = bounded => result,
    };

    if let Err(e) = &result {
        warn!("Fetch of {} failed ({}): {e}", request.url, e.kind());
    }
    result
}

/// Parses `raw` and accepts only the http and https schemes.
fn validate_url(raw: &str) -> Result<Url, FetchError> {
    let invalid = || FetchError::InvalidUrl {
        url: raw.to_string(),
    };
    let url = Url::parse(raw).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(invalid()),
    }
}

async fn execute(
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<String>,
    client: &HttpClient,
    config: &FetchConfig,
) -> Result<Response, FetchError> {
    let started = Instant::now();
    let requested = url.to_string();
    debug!("Sending {method} request to {requested}");

    let mut builder = client
        .client()
        .request(method.into(), url)
        .headers(headers);
    if let Some(body) = body {
        debug!("Attaching {} byte form body", body.len());
        builder = builder.body(body);
    }

    let response = builder.send().await.map_err(|source| FetchError::Transport {
        url: requested.clone(),
        kind: categorize_reqwest_error(&source),
        source,
    })?;
    let response_time = started.elapsed();

    let code = response.status().as_u16();
    let version = response.version();
    let final_url = response.url().to_string();
    let cookies = extract_cookies(&response);
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if final_url != requested {
        debug!("{requested} redirected to {final_url}");
    }

    let download_started = Instant::now();
    let body = read_body(response, config.max_body_size, &final_url).await?;
    let download_time = download_started.elapsed();
    debug!("Read {} bytes from {final_url}", body.len());

    let mime_type = sniff_prefix(&body, config.sniff_len);
    let decoded = decode_body(&body, mime_type);
    info!("{code} | {version:?} | {mime_type} | {final_url}");

    let response = Response {
        url: final_url,
        body,
        code,
        text: decoded.text,
        mime_type: mime_type.to_string(),
        cookies,
        file_type: decoded.file_type,
        charset: decoded.charset,
        content_type,
        timing: ResponseTiming {
            response_time,
            download_time,
            total_time: started.elapsed(),
        },
    };

    if decoded.had_errors {
        return Err(FetchError::Decode {
            charset: response.charset.clone(),
            response: Box::new(response),
        });
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_accepts_http_schemes() {
        assert!(validate_url("http://example.com/a?b=c").is_ok());
        assert!(validate_url("HTTPS://example.com").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_other_input() {
        for raw in ["", "example.com", "ftp://example.com", "file:///etc/hosts", "http://"] {
            let err = validate_url(raw).unwrap_err();
            assert_eq!(err.kind(), "invalid_url", "{raw:?} should be rejected");
        }
    }
}
