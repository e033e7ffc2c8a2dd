//! Client for the Creative Exchange package API.
//!
//! [`CrexClient`] is the single point of authenticated communication with the remote
//! repository. It is built once per command from an immutable [`ClientOptions`] and
//! exposes one typed method per remote operation. Each operation is bound to exactly
//! one [`TransportMode`] through [`Operation::mode`]; the mapping never depends on
//! the arguments.
//!
//! | Operation | Mode | Endpoint |
//! |---|---|---|
//! | status | GET | `status.json` |
//! | list | GET | `packages.json` |
//! | create | POST | `create.json` |
//! | build | POST | `build.json` |
//! | download | DOWNLOAD | `download` |
//! | delete | DELETE | `package.json` |
//! | upload | UPLOAD | `upload.json` |
//! | install | POST | `install.json` |
//!
//! The client never retries. A failed request surfaces as
//! [`CrexError::Transport`](crate::core::CrexError::Transport) and the caller decides
//! what to do with it.
//!
//! # Examples
//!
//! ```rust,no_run
//! use crex_cli::client::{ClientOptions, CrexClient, InstallPackageArgs};
//!
//! # async fn example() -> crex_cli::core::Result<()> {
//! let options = ClientOptions::from_address("admin:admin@localhost:4502");
//! let client = CrexClient::new(options)?;
//!
//! let changes = client
//!     .install_package(&InstallPackageArgs { package_id: "pkg1".into(), synchronous: true })
//!     .await?;
//! println!("{} files changed", changes.total());
//! # Ok(())
//! # }
//! ```

pub mod models;
pub mod target;
pub mod transport;

pub use models::{
    ChangeSet, InstallPackageArgs, NewPackageArgs, PackageArgs, PackageListArgs, PackageRef,
    UploadPackageArgs,
};
pub use target::Target;
pub use transport::{PackageDownload, Payload, Session, TransportMode};

use crate::constants::{
    API_ROOT_PATH, DEFAULT_HOST, DEFAULT_PASSWORD, DEFAULT_PORT, DEFAULT_USER, PROXY_ENV_VARS,
};
use crate::core::{CrexError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Remote operations exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Package status
    Status,
    /// List all packages
    PackageList,
    /// Create a package from a repository path
    Create,
    /// Build a package
    Build,
    /// Download a package archive
    Download,
    /// Delete a package
    Delete,
    /// Upload a package archive
    Upload,
    /// Install an uploaded package
    Install,
}

impl Operation {
    /// Transport mode used by this operation.
    #[must_use]
    pub const fn mode(self) -> TransportMode {
        match self {
            Self::Status | Self::PackageList => TransportMode::Get,
            Self::Create | Self::Build | Self::Install => TransportMode::Post,
            Self::Download => TransportMode::Download,
            Self::Delete => TransportMode::Delete,
            Self::Upload => TransportMode::Upload,
        }
    }

    /// Endpoint below [`API_ROOT_PATH`].
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Status => "status.json",
            Self::PackageList => "packages.json",
            Self::Create => "create.json",
            Self::Build => "build.json",
            Self::Download => "download",
            Self::Delete => "package.json",
            Self::Upload => "upload.json",
            Self::Install => "install.json",
        }
    }

    /// Short name used in logs and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::PackageList => "list",
            Self::Create => "create",
            Self::Build => "build",
            Self::Download => "download",
            Self::Delete => "delete",
            Self::Upload => "upload",
            Self::Install => "install",
        }
    }

    /// Full request path.
    #[must_use]
    pub fn path(self) -> String {
        format!("{API_ROOT_PATH}/{}", self.endpoint())
    }
}

/// Connection settings for one client session.
///
/// Built once and never mutated afterwards. [`Default`] uses the documented
/// constants and reads the outbound proxy from `https_proxy` or `http_proxy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Basic-auth user
    pub user: String,
    /// Basic-auth password
    pub password: String,
    /// Remote host
    pub host: String,
    /// Remote port; empty means no usable base address
    pub port: String,
    /// Outbound proxy URL
    pub proxy: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT.to_string(),
            proxy: Self::proxy_from_env(),
        }
    }
}

impl ClientOptions {
    /// Options for a `user:password@host[:port]` address, proxy taken from the environment.
    #[must_use]
    pub fn from_address(address: &str) -> Self {
        Self::default().with_target(&Target::resolve(address))
    }

    /// Replace credentials, host and port with the given target.
    #[must_use]
    pub fn with_target(mut self, target: &Target) -> Self {
        self.user.clone_from(&target.user);
        self.password.clone_from(&target.password);
        self.host.clone_from(&target.host);
        self.port.clone_from(&target.port);
        self
    }

    /// Override the outbound proxy.
    #[must_use]
    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    /// First non-empty value of `https_proxy`, `http_proxy`.
    #[must_use]
    pub fn proxy_from_env() -> Option<String> {
        PROXY_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.is_empty())
    }

    /// The target these options connect to.
    #[must_use]
    pub fn target(&self) -> Target {
        Target {
            user: self.user.clone(),
            password: self.password.clone(),
            host: self.host.clone(),
            port: self.port.clone(),
        }
    }
}

/// Authenticated client for the Creative Exchange API.
#[derive(Debug, Clone)]
pub struct CrexClient {
    session: Session,
    proxy: Option<String>,
}

impl CrexClient {
    /// Build a client session from `options`.
    ///
    /// # Errors
    ///
    /// Returns [`CrexError::Configuration`] if the proxy URL is invalid or the HTTP
    /// client cannot be initialised. An empty base address is not an error here;
    /// it is logged and every request on this client will then fail.
    pub fn new(options: ClientOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("crex/", env!("CARGO_PKG_VERSION")));

        builder = match &options.proxy {
            Some(proxy) => {
                let proxy = reqwest::Proxy::all(proxy).map_err(|e| CrexError::Configuration {
                    message: format!("invalid proxy '{proxy}': {e}"),
                })?;
                builder.proxy(proxy)
            }
            None => builder.no_proxy(),
        };

        let http = builder.build().map_err(|e| CrexError::Configuration {
            message: format!("failed to initialise HTTP client: {e}"),
        })?;

        let session = Session::new(http, options.target());
        if session.base_address().is_empty() {
            warn!("Target {} has no port; requests have no base address", options.host);
        } else {
            debug!("Client bound to {}", session.base_address());
        }

        Ok(Self {
            session,
            proxy: options.proxy,
        })
    }

    /// Base address of the remote API, empty when the target has no port.
    #[must_use]
    pub fn address(&self) -> &str {
        self.session.base_address()
    }

    /// Outbound proxy in use, if any.
    #[must_use]
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Status of a package.
    pub async fn get_status(&self, args: &PackageArgs) -> Result<Value> {
        let response = self.dispatch(Operation::Status, params(args)?).await?;
        decode_value(Operation::Status, response).await
    }

    /// All packages known to the remote repository.
    pub async fn get_package_list(&self, args: Option<&PackageListArgs>) -> Result<Value> {
        let payload = match args {
            Some(args) => params(args)?,
            None => Payload::Params(Value::Null),
        };
        let response = self.dispatch(Operation::PackageList, payload).await?;
        decode_value(Operation::PackageList, response).await
    }

    /// Create a package rooted at `args.root_path`.
    pub async fn create_package(&self, args: &NewPackageArgs) -> Result<PackageRef> {
        let response = self.dispatch(Operation::Create, params(args)?).await?;
        decode(Operation::Create, response).await
    }

    /// Build a package.
    pub async fn build_package(&self, args: &PackageArgs) -> Result<Value> {
        let response = self.dispatch(Operation::Build, params(args)?).await?;
        decode_value(Operation::Build, response).await
    }

    /// Start downloading a package; the body is streamed by [`PackageDownload::write_to`].
    pub async fn download_package(&self, args: &PackageArgs) -> Result<PackageDownload> {
        let response = self.dispatch(Operation::Download, params(args)?).await?;
        Ok(PackageDownload::new(response))
    }

    /// Delete a package.
    pub async fn delete_package(&self, args: &PackageArgs) -> Result<Value> {
        let response = self.dispatch(Operation::Delete, params(args)?).await?;
        decode_value(Operation::Delete, response).await
    }

    /// Upload a package file as a streamed multipart body.
    pub async fn upload_package(&self, args: UploadPackageArgs) -> Result<PackageRef> {
        let response = self.dispatch(Operation::Upload, Payload::File(args)).await?;
        decode(Operation::Upload, response).await
    }

    /// Install an uploaded package.
    ///
    /// With `synchronous` set the call returns once the install is done and the
    /// response carries the [`ChangeSet`].
    pub async fn install_package(&self, args: &InstallPackageArgs) -> Result<ChangeSet> {
        let response = self.dispatch(Operation::Install, params(args)?).await?;
        decode(Operation::Install, response).await
    }

    async fn dispatch(&self, operation: Operation, payload: Payload) -> Result<reqwest::Response> {
        self.session.send(operation.mode(), operation.name(), &operation.path(), payload).await
    }
}

fn params<T: Serialize>(args: &T) -> Result<Payload> {
    serde_json::to_value(args).map(Payload::Params).map_err(|e| CrexError::Other {
        message: format!("failed to encode request arguments: {e}"),
    })
}

async fn decode<T: DeserializeOwned>(operation: Operation, response: reqwest::Response) -> Result<T> {
    response.json::<T>().await.map_err(|e| CrexError::transport(operation.name(), e))
}

async fn decode_value(operation: Operation, response: reqwest::Response) -> Result<Value> {
    let body = response.bytes().await.map_err(|e| CrexError::transport(operation.name(), e))?;
    if body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&body).map_err(|e| CrexError::Other {
        message: format!("invalid JSON returned by {}: {e}", operation.name()),
    })
}
