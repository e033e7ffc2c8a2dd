//! HTTP transport for the remote API.
//!
//! Every client operation maps statically to one [`TransportMode`], and every mode
//! is bound to exactly one handler function in this module. All requests go through
//! [`Session::request`], which joins the path onto the base address and attaches
//! basic authentication.

use crate::client::models::UploadPackageArgs;
use crate::client::target::Target;
use crate::constants::UPLOAD_FIELD_NAME;
use crate::core::{CrexError, Result};
use crate::utils::ProgressBar;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Method, RequestBuilder, Response};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace};

/// The closed set of request shapes the remote API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// GET with query parameters, JSON response
    Get,
    /// POST with JSON body, JSON response
    Post,
    /// DELETE with query parameters, JSON response
    Delete,
    /// POST with a streamed multipart file body, JSON response
    Upload,
    /// GET with query parameters, streamed binary response
    Download,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Upload => "UPLOAD",
            Self::Download => "DOWNLOAD",
        };
        f.write_str(name)
    }
}

/// What a request carries besides its path.
#[derive(Debug)]
pub enum Payload {
    /// Serialized operation arguments (query string or JSON body)
    Params(Value),
    /// A package file for [`TransportMode::Upload`]
    File(UploadPackageArgs),
}

impl Payload {
    fn into_params(self) -> Value {
        match self {
            Self::Params(value) => value,
            Self::File(_) => Value::Null,
        }
    }

    fn into_file(self) -> Result<UploadPackageArgs> {
        match self {
            Self::File(file) => Ok(file),
            Self::Params(_) => Err(CrexError::Configuration {
                message: "upload requests need a package file".to_string(),
            }),
        }
    }
}

/// Authenticated HTTP session bound to one target.
#[derive(Debug, Clone)]
pub struct Session {
    http: reqwest::Client,
    base_address: String,
    target: Target,
}

impl Session {
    /// Wrap an HTTP client with the target's base address and credentials.
    pub(crate) fn new(http: reqwest::Client, target: Target) -> Self {
        Self {
            http,
            base_address: target.base_address(),
            target,
        }
    }

    /// Base address requests are resolved against. Empty when the target has no port.
    #[must_use]
    pub fn base_address(&self) -> &str {
        &self.base_address
    }

    /// Start a request for `path` with basic authentication attached.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_address, path);
        trace!("{} {}", method, url);
        self.http.request(method, url).basic_auth(&self.target.user, Some(&self.target.password))
    }

    /// Send `payload` to `path` using the handler bound to `mode`.
    ///
    /// Non-2xx responses become [`CrexError::Transport`] tagged with `operation`.
    pub async fn send(
        &self,
        mode: TransportMode,
        operation: &str,
        path: &str,
        payload: Payload,
    ) -> Result<Response> {
        debug!("{} {} ({})", mode, path, operation);

        let response = match mode {
            TransportMode::Get => get(self, path, &payload.into_params()).await,
            TransportMode::Post => post(self, path, &payload.into_params()).await,
            TransportMode::Delete => delete(self, path, &payload.into_params()).await,
            TransportMode::Upload => upload(self, path, payload.into_file()?).await,
            TransportMode::Download => download(self, path, &payload.into_params()).await,
        };

        response
            .and_then(Response::error_for_status)
            .map_err(|e| CrexError::transport(operation, e))
    }
}

fn with_query(request: RequestBuilder, params: &Value) -> RequestBuilder {
    match params.as_object() {
        Some(map) if !map.is_empty() => request.query(map),
        _ => request,
    }
}

async fn get(session: &Session, path: &str, params: &Value) -> reqwest::Result<Response> {
    with_query(session.request(Method::GET, path), params).send().await
}

async fn post(session: &Session, path: &str, params: &Value) -> reqwest::Result<Response> {
    session.request(Method::POST, path).json(params).send().await
}

async fn delete(session: &Session, path: &str, params: &Value) -> reqwest::Result<Response> {
    with_query(session.request(Method::DELETE, path), params).send().await
}

async fn upload(
    session: &Session,
    path: &str,
    args: UploadPackageArgs,
) -> reqwest::Result<Response> {
    let UploadPackageArgs { file, file_name } = args;
    let length = file.metadata().await.map(|m| m.len()).ok();

    let body = Body::from(file);
    let part = match length {
        Some(length) => Part::stream_with_length(body, length),
        None => Part::stream(body),
    }
    .file_name(file_name);

    let form = Form::new().part(UPLOAD_FIELD_NAME, part);
    session.request(Method::POST, path).multipart(form).send().await
}

async fn download(session: &Session, path: &str, params: &Value) -> reqwest::Result<Response> {
    with_query(session.request(Method::GET, path), params).send().await
}

/// A package download whose body has not been read yet.
#[derive(Debug)]
pub struct PackageDownload {
    response: Response,
}

impl PackageDownload {
    pub(crate) fn new(response: Response) -> Self {
        Self { response }
    }

    /// Size announced by the server, if any.
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }

    /// Stream the body into `destination`, returning the number of bytes written.
    ///
    /// The file is created or truncated and `progress` follows the byte count. A
    /// broken stream leaves a partial file behind.
    pub async fn write_to(self, destination: &Path, progress: &ProgressBar) -> Result<u64> {
        let mut file = tokio::fs::File::create(destination).await?;
        let mut stream = self.response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| CrexError::transport("download", e))?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
            progress.set_position(written);
        }

        file.flush().await?;
        debug!("Downloaded {} bytes to {}", written, destination.display());
        Ok(written)
    }
}
