//! The `Bot`/`Client` type (§4.2): owns the base URL, auth token and HTTP
//! transport, executes call descriptors through the interceptor chain, and
//! decodes response envelopes.

pub mod envelope;

pub use envelope::ResponseEnvelope;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    middleware::Chain,
    net::{self, EncodedBody},
    requests::CallDescriptor,
    types::User,
    Error, Result,
};

const DEFAULT_SERVER: &str = "https://api.telegram.org";

/// Builds a [`Bot`], mirroring the teacher's builder-then-freeze pattern for
/// client configuration.
pub struct ClientBuilder {
    token: String,
    server_url: String,
    http: Option<reqwest::Client>,
    test_environment: bool,
    middlewares: Vec<Arc<dyn crate::middleware::Middleware>>,
}

impl ClientBuilder {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            server_url: DEFAULT_SERVER.to_owned(),
            http: None,
            test_environment: false,
            middlewares: Vec::new(),
        }
    }

    /// Points this client at a different Bot API server (a local test
    /// server, for instance).
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    /// Supplies a pre-configured `reqwest::Client` (custom timeouts, a
    /// proxy, ...) instead of the crate's own default.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Switches every call to the `/test/` endpoint segment Telegram uses
    /// for its Bot API test environment.
    pub fn test_environment(mut self, enabled: bool) -> Self {
        self.test_environment = enabled;
        self
    }

    /// Appends an interceptor. Order matters: the first one appended runs
    /// outermost (§4.3).
    pub fn with_middleware(mut self, middleware: impl crate::middleware::Middleware + 'static) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    pub fn build(self) -> Result<Bot> {
        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder().build().map_err(Error::Network)?,
        };
        Ok(Bot {
            inner: Arc::new(Inner {
                token: self.token,
                server_url: self.server_url,
                test_environment: self.test_environment,
                http,
                chain: Chain::new(self.middlewares),
                me: Mutex::new(None),
            }),
        })
    }
}

struct Inner {
    token: String,
    server_url: String,
    test_environment: bool,
    http: reqwest::Client,
    chain: Chain,
    me: Mutex<Option<User>>,
}

/// A handle to the Bot API. Cheap to clone: every clone shares the same
/// `Arc`-backed state, which is what lets the interceptor chain's raw
/// invoker close over an owned handle instead of borrowing `&self` (see
/// the `'static` bound on [`crate::middleware::Chain::call`]).
#[derive(Clone)]
pub struct Bot {
    inner: Arc<Inner>,
}

impl Bot {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(token).build()
    }

    /// Builds a bot from the `TG_BOT_TOKEN` environment variable.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("TG_BOT_TOKEN")
            .map_err(|_| Error::Config("TG_BOT_TOKEN is not set".to_owned()))?;
        Self::new(token)
    }

    pub fn builder(token: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(token)
    }

    fn call_url(&self, method: &str) -> String {
        let segment = if self.inner.test_environment { "/test" } else { "" };
        format!("{}/bot{}{}/{}", self.inner.server_url, self.inner.token, segment, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        let segment = if self.inner.test_environment { "/test" } else { "" };
        format!("{}/file/bot{}{}/{}", self.inner.server_url, self.inner.token, segment, file_path)
    }

    /// Executes a call descriptor through the interceptor chain and returns
    /// the decoded (but not yet typed) response envelope.
    pub async fn execute(&self, descriptor: CallDescriptor) -> Result<ResponseEnvelope> {
        let bot = self.clone();
        self.inner.chain.call(descriptor, move |d| {
            let bot = bot.clone();
            async move { bot.raw_execute(d).await }
        }).await
    }

    /// Runs a call and decodes its result into `T`, skipping the
    /// interceptor chain entirely when it's empty (§4.3 fast path).
    pub async fn do_request<T>(&self, descriptor: CallDescriptor) -> Result<T>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        let envelope = if self.inner.chain.is_empty() {
            self.raw_execute(descriptor).await?
        } else {
            self.execute(descriptor).await?
        };
        envelope.into_result()
    }

    /// The actual HTTP round trip plus envelope decode; this is what sits
    /// at the innermost end of the interceptor chain.
    async fn raw_execute(&self, descriptor: CallDescriptor) -> Result<ResponseEnvelope> {
        let url = self.call_url(descriptor.method);
        log::debug!("executing {} ({} args, {} files)", descriptor.method, descriptor.args.len(), descriptor.files.len());
        let encoded = net::encode(descriptor).await?;
        let request = match encoded {
            EncodedBody::Urlencoded(pairs) => self.inner.http.post(&url).form(&pairs),
            EncodedBody::Multipart(form) => self.inner.http.post(&url).multipart(form),
        };
        let response = request.send().await.map_err(|e| {
            log::warn!("network error talking to Telegram: {e}");
            Error::Network(e)
        })?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(Error::Network)?;
        ResponseEnvelope::parse(&body, status)
    }

    /// Downloads a file previously resolved via `getFile`, streaming its
    /// bytes back as a single buffer.
    pub async fn download_file(&self, file_path: &str) -> Result<bytes::Bytes> {
        let url = self.file_url(file_path);
        log::debug!("downloading {file_path}");
        let response = self.inner.http.get(&url).send().await.map_err(Error::Network)?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            // An error download always carries an error envelope, never a
            // real result; `()` is enough to surface it through `?`.
            ResponseEnvelope::parse(&body, status)?.into_result::<()>()?;
            return Err(Error::Config(format!("download failed with status {status} but no API error")));
        }
        response.bytes().await.map_err(Error::Network)
    }

    /// Returns this bot's own identity, fetching and caching it via
    /// `getMe` on first use (§4.2).
    pub async fn me(&self) -> Result<User> {
        let mut guard = self.inner.me.lock().await;
        if let Some(user) = guard.as_ref() {
            return Ok(user.clone());
        }
        let descriptor = CallDescriptor::new("getMe");
        let user: User = self.do_request(descriptor).await?;
        *guard = Some(user.clone());
        Ok(user)
    }

    pub fn token(&self) -> &str {
        &self.inner.token
    }
}
