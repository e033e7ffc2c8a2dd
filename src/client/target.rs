//! Target address parsing.
//!
//! A target is written `user:password@host[:port]`. Parsing is a pure string
//! transform: malformed input is never rejected here, it simply produces empty
//! fields. Callers that need validation do it upstream.

use std::fmt;

/// Resolved connection identity for the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Target {
    /// Basic-auth user
    pub user: String,
    /// Basic-auth password
    pub password: String,
    /// Host name or IP address
    pub host: String,
    /// Port, empty when the address carries none
    pub port: String,
}

impl Target {
    /// Parse a `user:password@host[:port]` address.
    ///
    /// The string is split on the last `@`. Without an `@` the credentials are
    /// empty and the whole string is treated as the host address. The password
    /// keeps any further `:` characters; the host address keeps only its first
    /// two `:`-separated segments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crex_cli::client::Target;
    ///
    /// let target = Target::resolve("admin:admin@localhost:4502");
    /// assert_eq!(target.user, "admin");
    /// assert_eq!(target.host, "localhost");
    /// assert_eq!(target.port, "4502");
    /// ```
    #[must_use]
    pub fn resolve(address: &str) -> Self {
        let (credentials, host_address) = match address.rfind('@') {
            Some(at) => (&address[..at], &address[at + 1..]),
            None => ("", address),
        };

        let (user, password) = credentials.split_once(':').unwrap_or((credentials, ""));

        let mut parts = host_address.split(':');
        let host = parts.next().unwrap_or_default();
        let port = parts.next().unwrap_or_default();

        Self {
            user: user.to_string(),
            password: password.to_string(),
            host: host.to_string(),
            port: port.to_string(),
        }
    }

    /// Base URL of the remote API, `http://{host}:{port}`.
    ///
    /// Returns an empty string when the port is empty. Requests built on an empty
    /// base address fail at the transport layer instead of at construction.
    #[must_use]
    pub fn base_address(&self) -> String {
        if self.port.is_empty() {
            String::new()
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.user, self.password, self.host)?;
        if !self.port.is_empty() {
            write!(f, ":{}", self.port)?;
        }
        Ok(())
    }
}
