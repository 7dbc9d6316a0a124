//! Upstream client for relaying uploads to the remote floorplan server

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use reqwest::{multipart::Form, Client, Url};

use crate::config::RelayConfig;
use crate::proxy::error::RelayError;
use crate::proxy::form::{REMOTE_IP_FIELD, REMOTE_PORT_FIELD};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Clone)]
pub struct RemoteClient {
    http_client: Client,
    remote_path: String,
}

impl RemoteClient {
    pub fn new(config: &RelayConfig) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .user_agent(concat!("floorplan-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let remote_path = if config.remote_path.starts_with('/') {
            config.remote_path.clone()
        } else {
            format!("/{}", config.remote_path)
        };

        Ok(Self { http_client, remote_path })
    }

    /// Build `http://<remote_ip>:<remote_port><remote_path>` from the routing fields
    pub fn target_url(
        &self,
        remote_ip: Option<&str>,
        remote_port: Option<&str>,
    ) -> Result<Url, RelayError> {
        let host = remote_ip
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(RelayError::MissingField(REMOTE_IP_FIELD))?;
        let port = remote_port
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(RelayError::MissingField(REMOTE_PORT_FIELD))?;
        let port: u16 = port
            .parse()
            .map_err(|_| RelayError::InvalidPort(port.to_string()))?;

        // Bare IPv6 literals need brackets in a URL authority
        let host = if host.contains(':') && !host.starts_with('[') {
            format!("[{}]", host)
        } else {
            host.to_string()
        };

        let url = format!("http://{}:{}{}", host, port, self.remote_path);
        Url::parse(&url).map_err(|e| RelayError::InvalidUrl {
            url,
            reason: e.to_string(),
        })
    }

    /// POST the form to the remote and buffer its full reply.
    /// Any HTTP status is a successful relay; only transport failures are errors.
    /// With no form the POST goes out with an empty body and no content type.
    pub async fn forward(&self, url: Url, form: Option<Form>) -> Result<RemoteReply, RelayError> {
        tracing::info!("Sending to remote server: {}", url);

        let mut request = self.http_client.post(url);
        if let Some(form) = form {
            request = request.multipart(form);
        }
        let response = request.send().await?;

        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = response.bytes().await?;

        tracing::info!("Remote responded {} with {} bytes", status, body.len());

        Ok(RemoteReply { status, content_type, body })
    }
}

/// Remote reply passed back to the caller unmodified
#[derive(Debug, Clone)]
pub struct RemoteReply {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl IntoResponse for RemoteReply {
    fn into_response(self) -> Response {
        let content_type = self
            .content_type
            .unwrap_or_else(|| HeaderValue::from_static(FALLBACK_CONTENT_TYPE));

        (
            self.status,
            [
                (header::CONTENT_TYPE, content_type),
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
            ],
            Body::from(self.body),
        )
            .into_response()
    }
}
