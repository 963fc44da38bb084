use std::fmt;
use std::time::Duration;

use reqwest::{header, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::{classify, ClientOptions, Result, WatsonError};

const BODY_SNIPPET_CHARS: usize = 500;

#[derive(Clone)]
/// HTTP client for a single Watson service instance.
///
/// The client does not know any endpoint. Callers build requests with
/// [`ServiceClient::request`], then send them with [`ServiceClient::send`] or
/// [`ServiceClient::send_json`]. Non-2xx responses come back as
/// [`WatsonError::Http`].
pub struct ServiceClient {
    http: reqwest::Client,
    service_url: String,
    version: String,
    authorization: String,
    options: ClientOptions,
}

impl fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClient")
            .field("service_url", &self.service_url)
            .field("version", &self.version)
            .field("authorization", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

impl ServiceClient {
    /// Creates a client with a raw `Authorization` header value.
    ///
    /// `version` is the API version date sent as the `version` query
    /// parameter, e.g. `"2019-02-11"`.
    pub fn new(
        service_url: impl Into<String>,
        version: impl Into<String>,
        authorization: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            service_url: service_url.into(),
            version: version.into(),
            authorization: authorization.into(),
            options: ClientOptions::default(),
        }
    }

    /// Creates a client from an access token.
    ///
    /// If the token is missing the `Bearer ` prefix, it is added automatically.
    pub fn new_bearer(
        service_url: impl Into<String>,
        version: impl Into<String>,
        token: impl AsRef<str>,
    ) -> Self {
        let authorization = normalize_bearer_authorization(token.as_ref());
        Self::new(service_url, version, authorization)
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `WATSON_SERVICE_URL` — service instance URL
    /// - `WATSON_VERSION` — API version date
    /// - `WATSON_ACCESS_TOKEN` — access token (Bearer prefix optional)
    ///
    /// **Not available on `wasm32` targets.**
    ///
    /// # Example
    ///
    /// ```no_run
    /// use watson_http::ServiceClient;
    ///
    /// let client = ServiceClient::from_env().expect("missing WATSON_* env vars");
    /// ```
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self> {
        let service_url = required_env("WATSON_SERVICE_URL")?;
        let version = required_env("WATSON_VERSION")?;
        let token = required_env("WATSON_ACCESS_TOKEN")?;
        Ok(Self::new_bearer(service_url, version, token))
    }

    /// Applies client options such as timeout and default headers.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Base URL that request paths are joined to.
    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// API version date sent as the `version` query parameter.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Starts a request to `path`, relative to the service URL.
    ///
    /// The builder already carries the `version` query parameter, the
    /// authorization and accept headers, default headers and the timeout.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = join_url(&self.service_url, path);
        let mut builder = self
            .http
            .request(method, url)
            .query(&[("version", self.version.as_str())])
            .header(header::AUTHORIZATION, &self.authorization)
            .header(header::ACCEPT, "application/json")
            .timeout(Duration::from_millis(self.options.timeout_ms));

        for (name, value) in &self.options.default_headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    /// Sends a request and returns the raw body of a successful response.
    pub async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>> {
        let response = request.send().await.map_err(WatsonError::Transport)?;
        let status = response.status();

        #[cfg(feature = "tracing")]
        tracing::debug!(status = status.as_u16(), url = %response.url(), "watson response");

        if !status.is_success() {
            // An unreadable body is classified like an empty one.
            let body = match response.bytes().await {
                Ok(body) => body.to_vec(),
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        status = status.as_u16(),
                        error = %_err,
                        "failed to read error body; classifying as empty"
                    );
                    Vec::new()
                }
            };
            let err = classify(&body, status.as_u16());

            #[cfg(feature = "tracing")]
            tracing::warn!(
                status = err.status_code,
                message = err.message.as_deref().unwrap_or(""),
                "watson request failed"
            );

            return Err(WatsonError::Http(err));
        }

        let body = response.bytes().await.map_err(WatsonError::Transport)?;
        Ok(body.to_vec())
    }

    /// Sends a request and deserializes the JSON body of a successful response.
    ///
    /// An empty body decodes as JSON `null`, so `()` and `Option<T>` can be
    /// used for endpoints that return nothing.
    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body = self.send(request).await?;
        let json = if body.iter().all(u8::is_ascii_whitespace) {
            b"null".as_slice()
        } else {
            body.as_slice()
        };

        serde_json::from_slice::<T>(json).map_err(|err| {
            WatsonError::Decode(format!(
                "invalid response JSON: {err}; body: {}",
                body_snippet(&body)
            ))
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn required_env(name: &str) -> Result<String> {
    let value = std::env::var(name)
        .map_err(|_| WatsonError::Config(format!("missing {name} environment variable")))?;
    if value.trim().is_empty() {
        return Err(WatsonError::Config(format!("{name} is set but empty")));
    }
    Ok(value)
}

fn join_url(service_url: &str, path: &str) -> String {
    let base = service_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_owned()
    } else {
        format!("{base}/{path}")
    }
}

fn body_snippet(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.chars().count() <= BODY_SNIPPET_CHARS {
        text.into_owned()
    } else {
        let truncated: String = text.chars().take(BODY_SNIPPET_CHARS).collect();
        format!("{truncated}...[truncated]")
    }
}

fn normalize_bearer_authorization(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        trimmed.to_owned()
    } else {
        format!("Bearer {trimmed}")
    }
}
