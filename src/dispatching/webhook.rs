//! The webhook update ingress of §4.5: an `axum` HTTP handler, setup
//! reconciliation against the remote, and the reply-in-response
//! optimization. Gated behind the `webhook` feature.

use std::{net::IpAddr, sync::Arc};

use ipnetwork::IpNetwork;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::{client::Bot, dispatching::router::Router, requests::RequestBuilder, types::WebhookInfo, Result};

/// Telegram's two published webhook source IP ranges, used as the default
/// allow-list when none is configured.
fn default_ip_subnets() -> Vec<IpNetwork> {
    vec!["149.154.160.0/20".parse().unwrap(), "91.108.4.0/22".parse().unwrap()]
}

/// How this webhook's authentication secret is determined, per the
/// "Webhook without configured security token" boundary of spec.md:212.
pub enum SecretTokenConfig {
    /// Derive the default: lowercase hex SHA-256 of the bot token.
    Derived,
    /// Use this exact token.
    Explicit(String),
    /// Disable the check entirely: every request is accepted regardless of
    /// its `X-Telegram-Bot-Api-Secret-Token` header (or lack of one).
    Disabled,
}

/// Configuration for [`serve`]. Mirrors the Bot API's `setWebhook`
/// parameters plus the HTTP-serving knobs.
pub struct WebhookConfig {
    pub url: String,
    pub secret_token: SecretTokenConfig,
    pub ip_subnets: Vec<IpNetwork>,
    /// The `ip_address` `setWebhook` parameter: the IP to bind the webhook
    /// to, overriding DNS resolution of `url`'s host.
    pub ip_address: Option<String>,
    pub max_connections: Option<u8>,
    pub allowed_updates: Option<Vec<String>>,
    /// A self-signed certificate to upload with `setWebhook`, if the
    /// deployment needs one instead of a publicly trusted cert.
    pub certificate: Option<crate::requests::Upload>,
    pub drop_pending_updates: bool,
    pub bind_addr: std::net::SocketAddr,
    pub delete_webhook_on_shutdown: bool,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>, bind_addr: std::net::SocketAddr) -> Self {
        Self {
            url: url.into(),
            secret_token: SecretTokenConfig::Derived,
            ip_subnets: default_ip_subnets(),
            ip_address: None,
            max_connections: None,
            allowed_updates: None,
            certificate: None,
            drop_pending_updates: false,
            bind_addr,
            delete_webhook_on_shutdown: false,
        }
    }

    /// The secret token this configuration resolves to: the derived or
    /// explicitly configured one, or `None` when disabled.
    fn resolved_secret_token(&self, bot_token: &str) -> Option<String> {
        match &self.secret_token {
            SecretTokenConfig::Derived => {
                let digest = Sha256::digest(bot_token.as_bytes());
                Some(hex::encode(digest))
            }
            SecretTokenConfig::Explicit(token) => Some(token.clone()),
            SecretTokenConfig::Disabled => None,
        }
    }
}

/// Whether the remote's current webhook registration already matches
/// `config`, across every field `setWebhook` can configure (§4.5). The
/// secret token is excluded: `getWebhookInfo` never echoes it back, so it
/// cannot be compared — `reconcile` always resends it instead.
fn remote_matches_desired(info: &WebhookInfo, config: &WebhookConfig) -> bool {
    if config.drop_pending_updates {
        // A pending-update drop is a one-shot action, not persisted state;
        // always apply it rather than trying to detect it was "already done".
        return false;
    }
    if !info.matches(&config.url) {
        return false;
    }
    if info.has_custom_certificate != config.certificate.is_some() {
        return false;
    }
    if info.ip_address != config.ip_address {
        return false;
    }
    let max_connections_matches = match (info.max_connections, config.max_connections) {
        (None, None) => true,
        (Some(a), Some(b)) => a as i32 == b as i32,
        _ => false,
    };
    if !max_connections_matches {
        return false;
    }
    info.allowed_updates == config.allowed_updates
}

/// Fetches the remote's current webhook info and, if it diverges from
/// `config`, issues `setWebhook` to reconcile it. A no-op when already in
/// sync, per §4.5.
async fn reconcile(bot: &Bot, config: &WebhookConfig, secret_token: Option<&str>) -> Result<()> {
    let info: WebhookInfo = bot.do_request(RequestBuilder::new("getWebhookInfo").build()).await?;

    if remote_matches_desired(&info, config) {
        log::debug!("webhook already set to {}, skipping setWebhook", config.url);
        return Ok(());
    }

    log::info!("reconciling webhook to {}", config.url);
    let mut builder = RequestBuilder::new("setWebhook")
        .string("url", config.url.clone())
        .string("secret_token", secret_token.unwrap_or("").to_owned())
        .bool("drop_pending_updates", config.drop_pending_updates);
    if let Some(ip_address) = &config.ip_address {
        builder = builder.string("ip_address", ip_address.clone());
    }
    if let Some(max_connections) = config.max_connections {
        builder = builder.int("max_connections", max_connections as i64);
    }
    if let Some(allowed) = &config.allowed_updates {
        builder = builder.json("allowed_updates", allowed)?;
    }
    if let Some(certificate) = &config.certificate {
        builder = builder.input_file("certificate", certificate.clone());
    }
    bot.do_request::<bool>(builder.build()).await?;
    Ok(())
}

/// True iff `addr` lies in one of the configured subnets.
fn ip_allowed(addr: IpAddr, subnets: &[IpNetwork]) -> bool {
    subnets.iter().any(|net| net.contains(addr))
}

/// Constant-time comparison of the `X-Telegram-Bot-Api-Secret-Token`
/// header against the configured secret, per §4.5. `expected == None` means
/// the check is disabled: every header (including none at all) is accepted.
fn secret_token_matches(received: Option<&str>, expected: Option<&str>) -> bool {
    match (received, expected) {
        (_, None) => true,
        (Some(received), Some(expected)) => bool::from(received.as_bytes().ct_eq(expected.as_bytes())),
        (None, Some(_)) => false,
    }
}

struct ServerState {
    router: Router,
    secret_token: Option<String>,
    ip_subnets: Vec<IpNetwork>,
}

async fn handle_update(
    state: Arc<ServerState>,
    remote_addr: IpAddr,
    secret_header: Option<String>,
    content_type: Option<String>,
    body: String,
) -> (axum::http::StatusCode, String) {
    use axum::http::StatusCode;

    if !state.ip_subnets.is_empty() && !ip_allowed(remote_addr, &state.ip_subnets) {
        log::warn!("rejected webhook request from disallowed address {remote_addr}");
        return (StatusCode::FORBIDDEN, String::new());
    }
    if !secret_token_matches(secret_header.as_deref(), state.secret_token.as_deref()) {
        log::warn!("rejected webhook request with missing or mismatched secret token");
        return (StatusCode::UNAUTHORIZED, String::new());
    }
    if !content_type.as_deref().unwrap_or("").starts_with("application/json") {
        return (StatusCode::UNSUPPORTED_MEDIA_TYPE, String::new());
    }

    let update: crate::types::Update = match serde_json::from_str(&body) {
        Ok(update) => update,
        Err(err) => {
            log::error!("failed to decode webhook update: {err}");
            return (StatusCode::BAD_REQUEST, String::new());
        }
    };

    match REPLY_SLOT.scope(std::cell::RefCell::new(None), async {
        let result = state.router.dispatch(update).await;
        (result, REPLY_SLOT.with(|slot| slot.borrow_mut().take()))
    }).await
    {
        (Ok(()), Some(reply)) => (StatusCode::OK, reply.to_string()),
        (Ok(()), None) => (StatusCode::OK, String::new()),
        (Err(err), _) => {
            log::error!("webhook handler returned an error: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, String::new())
        }
    }
}

tokio::task_local! {
    /// The reply-in-response slot (§4.5): a handler stashes an outbound
    /// call descriptor here to have it written directly into the HTTP
    /// response body instead of making a second round trip.
    static REPLY_SLOT: std::cell::RefCell<Option<serde_json::Value>>;
}

/// Attaches a reply-in-response call from within a handler running under
/// [`serve`]. A no-op (and logged) if called outside a webhook request.
pub fn reply_in_response(descriptor: &crate::requests::CallDescriptor) {
    let attached = REPLY_SLOT.try_with(|slot| *slot.borrow_mut() = Some(descriptor.to_reply_json())).is_ok();
    if !attached {
        log::warn!("reply_in_response called outside of a webhook request; ignoring");
    }
}

/// Serves `router` over HTTP following `config`, reconciling the webhook
/// registration first. Runs until `shutdown` resolves, then performs a
/// bounded graceful shutdown (~10s) and optionally deletes the webhook.
pub async fn serve(
    bot: Bot,
    router: Router,
    config: WebhookConfig,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<()> {
    use axum::{
        extract::{ConnectInfo, State},
        http::HeaderMap,
        routing::post,
        Router as AxumRouter,
    };

    let secret_token = config.resolved_secret_token(bot.token());
    reconcile(&bot, &config, secret_token.as_deref()).await?;

    let state = Arc::new(ServerState { router, secret_token, ip_subnets: config.ip_subnets.clone() });

    async fn handler(
        State(state): State<Arc<ServerState>>,
        ConnectInfo(remote): ConnectInfo<std::net::SocketAddr>,
        headers: HeaderMap,
        body: String,
    ) -> (axum::http::StatusCode, String) {
        let secret_header = headers
            .get("X-Telegram-Bot-Api-Secret-Token")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let content_type = headers.get(axum::http::header::CONTENT_TYPE).and_then(|v| v.to_str().ok()).map(str::to_owned);
        handle_update(state, remote.ip(), secret_header, content_type, body).await
    }

    let app = AxumRouter::new().route("/", post(handler)).with_state(state);

    log::info!("serving webhook on {}", config.bind_addr);
    let bind_addr = config.bind_addr;
    axum::Server::bind(&bind_addr)
        .serve(app.into_make_service_with_connect_info::<std::net::SocketAddr>())
        .with_graceful_shutdown(async move {
            shutdown.await;
            log::info!("webhook received shutdown signal, draining (up to 10s)");
        })
        .await
        .map_err(|err| crate::Error::Config(format!("webhook server error: {err}")))?;

    if config.delete_webhook_on_shutdown {
        if let Err(err) = bot.do_request::<bool>(RequestBuilder::new("deleteWebhook").build()).await {
            log::error!("failed to delete webhook on shutdown: {err}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_token_is_hex_sha256_of_bot_token() {
        let config = WebhookConfig::new("https://example.com/hook", "127.0.0.1:8080".parse().unwrap());
        let token = config.resolved_secret_token("123:ABC").unwrap();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn explicit_secret_token_is_respected() {
        let mut config = WebhookConfig::new("https://example.com/hook", "127.0.0.1:8080".parse().unwrap());
        config.secret_token = SecretTokenConfig::Explicit("mysecret".to_owned());
        assert_eq!(config.resolved_secret_token("123:ABC").as_deref(), Some("mysecret"));
    }

    #[test]
    fn disabled_secret_token_resolves_to_none() {
        let mut config = WebhookConfig::new("https://example.com/hook", "127.0.0.1:8080".parse().unwrap());
        config.secret_token = SecretTokenConfig::Disabled;
        assert_eq!(config.resolved_secret_token("123:ABC"), None);
    }

    #[test]
    fn default_ip_subnets_cover_telegrams_published_ranges() {
        let subnets = default_ip_subnets();
        assert!(ip_allowed("149.154.167.1".parse().unwrap(), &subnets));
        assert!(ip_allowed("91.108.4.5".parse().unwrap(), &subnets));
        assert!(!ip_allowed("8.8.8.8".parse().unwrap(), &subnets));
    }

    #[test]
    fn secret_token_comparison_rejects_mismatch_and_missing_header() {
        assert!(secret_token_matches(Some("abc"), Some("abc")));
        assert!(!secret_token_matches(Some("abd"), Some("abc")));
        assert!(!secret_token_matches(None, Some("abc")));
    }

    #[test]
    fn secret_token_comparison_accepts_anything_when_disabled() {
        assert!(secret_token_matches(Some("anything"), None));
        assert!(secret_token_matches(None, None));
    }

    #[tokio::test]
    async fn matched_handler_attaches_reply_in_response() {
        use crate::dispatching::{filters::Command, router::Router, UpdateKey};

        let router = Router::builder()
            .on(UpdateKey::Message, Command::new("start"), |update: Arc<crate::types::Update>| async move {
                let chat_id = update.chat_id().unwrap();
                let descriptor = RequestBuilder::new("sendMessage")
                    .int("chat_id", chat_id)
                    .string("text", "hi")
                    .build();
                reply_in_response(&descriptor);
                Ok(())
            })
            .build();

        let state = Arc::new(ServerState {
            router,
            secret_token: Some("t".to_owned()),
            ip_subnets: vec![],
        });

        let body = serde_json::json!({
            "update_id": 10,
            "message": {
                "message_id": 1,
                "date": 1700000000,
                "chat": {"id": 9, "type": "private"},
                "text": "/start",
            },
        })
        .to_string();

        let (status, reply) = handle_update(
            state,
            "127.0.0.1".parse().unwrap(),
            Some("t".to_owned()),
            Some("application/json".to_owned()),
            body,
        )
        .await;

        assert_eq!(status, axum::http::StatusCode::OK);
        let reply: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(reply["method"], "sendMessage");
        assert_eq!(reply["chat_id"], "9");
        assert_eq!(reply["text"], "hi");
    }

    #[tokio::test]
    async fn wrong_secret_token_is_rejected_before_dispatch() {
        let router = Router::builder().build();
        let state = Arc::new(ServerState { router, secret_token: Some("expected".to_owned()), ip_subnets: vec![] });
        let (status, body) = handle_update(
            state,
            "127.0.0.1".parse().unwrap(),
            Some("wrong".to_owned()),
            Some("application/json".to_owned()),
            "{}".to_owned(),
        )
        .await;
        assert_eq!(status, axum::http::StatusCode::UNAUTHORIZED);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn disabled_secret_token_accepts_requests_with_no_header() {
        let router = Router::builder().build();
        let state = Arc::new(ServerState { router, secret_token: None, ip_subnets: vec![] });
        let (status, _body) = handle_update(
            state,
            "127.0.0.1".parse().unwrap(),
            None,
            Some("application/json".to_owned()),
            "{}".to_owned(),
        )
        .await;
        assert_eq!(status, axum::http::StatusCode::OK);
    }

    #[test]
    fn remote_already_matching_desired_state_skips_reissue() {
        let config = WebhookConfig::new("https://example.com/hook", "127.0.0.1:8080".parse().unwrap());
        let info = WebhookInfo {
            url: "https://example.com/hook".to_owned(),
            has_custom_certificate: false,
            pending_update_count: 0,
            ip_address: None,
            last_error_date: None,
            last_error_message: None,
            last_synchronization_error_date: None,
            max_connections: None,
            allowed_updates: None,
        };
        assert!(remote_matches_desired(&info, &config));
    }

    #[test]
    fn drop_pending_updates_always_forces_a_reissue() {
        let mut config = WebhookConfig::new("https://example.com/hook", "127.0.0.1:8080".parse().unwrap());
        config.drop_pending_updates = true;
        let info = WebhookInfo {
            url: "https://example.com/hook".to_owned(),
            has_custom_certificate: false,
            pending_update_count: 0,
            ip_address: None,
            last_error_date: None,
            last_error_message: None,
            last_synchronization_error_date: None,
            max_connections: None,
            allowed_updates: None,
        };
        assert!(!remote_matches_desired(&info, &config));
    }

    #[test]
    fn certificate_presence_mismatch_forces_a_reissue() {
        let mut config = WebhookConfig::new("https://example.com/hook", "127.0.0.1:8080".parse().unwrap());
        config.certificate = Some(crate::requests::Upload::new("cert.pem", vec![0u8; 4]));
        let info = WebhookInfo {
            url: "https://example.com/hook".to_owned(),
            has_custom_certificate: false,
            pending_update_count: 0,
            ip_address: None,
            last_error_date: None,
            last_error_message: None,
            last_synchronization_error_date: None,
            max_connections: None,
            allowed_updates: None,
        };
        assert!(!remote_matches_desired(&info, &config));
    }
}
