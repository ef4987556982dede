//! Executes core `HttpRequest` values over the network.

use todo_core::{ApiError, HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip. Implementations must report non-2xx
/// statuses as data; only transport failures are `Err`.
pub trait Transport: Send + Sync {
    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking transport on a shared ureq agent. No timeouts are configured.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = req.method.as_str(), url = %req.path, "sending request");
        let agent = &self.agent;
        let headers = &req.headers;
        let result = match req.method {
            HttpMethod::Get => with_headers(agent.get(&req.path), headers).call(),
            HttpMethod::Delete => with_headers(agent.delete(&req.path), headers).call(),
            HttpMethod::Post => send(with_headers(agent.post(&req.path), headers), req.body),
            HttpMethod::Put => send(with_headers(agent.put(&req.path), headers), req.body),
        };
        let mut response = result.map_err(|e| ApiError::NetworkError(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                let value = value.to_str().ok()?;
                Some((name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::NetworkError(e.to_string()))?;
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<String>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}
