use async_trait::async_trait;
use gamesdk_core::ports::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
use gamesdk_core::Error;
use reqwest::{Client, Method};
use tracing::{instrument, trace};

use crate::network::build_sdk_client;

/// `HttpTransport` backed by a reqwest client.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            client: build_sdk_client()?,
        })
    }

    /// Use a caller-supplied client (custom TLS, proxies, timeouts...).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Post => Method::POST,
        HttpMethod::Patch => Method::PATCH,
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(format!("failed to read response body: {}", e)))?;

        trace!(status, bytes = body.len(), "response received");

        Ok(HttpResponse { status, body })
    }
}
