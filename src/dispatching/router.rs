//! The two-level dispatcher of §4.7: update subtype × predicate chain,
//! wrapped in router-level middleware and a single error handler.

use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

use crate::types::{Update, UpdateKind};

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// A subtype key an update classifies to, per §4.6. Kept distinct from
/// [`UpdateKind`] (which carries the payload) so the router can index
/// handler lists by key alone.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum UpdateKey {
    Message,
    EditedMessage,
    ChannelPost,
    EditedChannelPost,
    InlineQuery,
    ChosenInlineResult,
    CallbackQuery,
    ShippingQuery,
    PreCheckoutQuery,
    Poll,
    PollAnswer,
    MyChatMember,
    ChatMember,
    ChatJoinRequest,
    MessageReaction,
    MessageReactionCount,
    ChatBoost,
    RemovedChatBoost,
    BusinessConnection,
    BusinessMessage,
    EditedBusinessMessage,
    DeletedBusinessMessages,
}

impl UpdateKey {
    fn of(update: &Update) -> Option<Self> {
        Some(match update.kind() {
            UpdateKind::Message(_) => Self::Message,
            UpdateKind::EditedMessage(_) => Self::EditedMessage,
            UpdateKind::ChannelPost(_) => Self::ChannelPost,
            UpdateKind::EditedChannelPost(_) => Self::EditedChannelPost,
            UpdateKind::InlineQuery(_) => Self::InlineQuery,
            UpdateKind::ChosenInlineResult(_) => Self::ChosenInlineResult,
            UpdateKind::CallbackQuery(_) => Self::CallbackQuery,
            UpdateKind::ShippingQuery(_) => Self::ShippingQuery,
            UpdateKind::PreCheckoutQuery(_) => Self::PreCheckoutQuery,
            UpdateKind::Poll(_) => Self::Poll,
            UpdateKind::PollAnswer(_) => Self::PollAnswer,
            UpdateKind::MyChatMember(_) => Self::MyChatMember,
            UpdateKind::ChatMember(_) => Self::ChatMember,
            UpdateKind::ChatJoinRequest(_) => Self::ChatJoinRequest,
            UpdateKind::MessageReaction(_) => Self::MessageReaction,
            UpdateKind::MessageReactionCount(_) => Self::MessageReactionCount,
            UpdateKind::ChatBoost(_) => Self::ChatBoost,
            UpdateKind::RemovedChatBoost(_) => Self::RemovedChatBoost,
            UpdateKind::BusinessConnection(_) => Self::BusinessConnection,
            UpdateKind::BusinessMessage(_) => Self::BusinessMessage,
            UpdateKind::EditedBusinessMessage(_) => Self::EditedBusinessMessage,
            UpdateKind::DeletedBusinessMessages(_) => Self::DeletedBusinessMessages,
            UpdateKind::Unknown => return None,
        })
    }
}

/// A handler invoked once a predicate matches. Boxed so the router can
/// hold a heterogeneous list of handlers behind one type.
pub trait Handler: Send + Sync {
    fn call(&self, update: Arc<Update>) -> BoxFuture<crate::Result<()>>;
}

impl<F, Fut> Handler for F
where
    F: Fn(Arc<Update>) -> Fut + Send + Sync,
    Fut: Future<Output = crate::Result<()>> + Send + 'static,
{
    fn call(&self, update: Arc<Update>) -> BoxFuture<crate::Result<()>> {
        Box::pin(self(update))
    }
}

/// Router-entry middleware, wrapping the classify-and-dispatch step.
#[async_trait::async_trait]
pub trait RouterMiddleware: Send + Sync {
    async fn handle(&self, update: Arc<Update>, next: RouterNext) -> crate::Result<()>;
}

type RawDispatch = dyn Fn(Arc<Update>) -> BoxFuture<crate::Result<()>> + Send + Sync;

#[derive(Clone)]
pub struct RouterNext {
    middlewares: Arc<[Arc<dyn RouterMiddleware>]>,
    index: usize,
    raw: Arc<RawDispatch>,
}

impl RouterNext {
    pub fn run(self, update: Arc<Update>) -> BoxFuture<crate::Result<()>> {
        match self.middlewares.get(self.index) {
            Some(mw) => {
                let mw = Arc::clone(mw);
                let next = RouterNext {
                    middlewares: self.middlewares.clone(),
                    index: self.index + 1,
                    raw: self.raw.clone(),
                };
                Box::pin(async move { mw.handle(update, next).await })
            }
            None => (self.raw)(update),
        }
    }
}

/// An error handler, invoked with the update that produced the error and
/// the error itself; returns the error that ultimately propagates (the
/// default handler returns it unchanged, per §4.7).
pub type ErrorHandler = Arc<dyn Fn(&Update, crate::Error) -> crate::Error + Send + Sync>;

fn default_error_handler(_update: &Update, err: crate::Error) -> crate::Error {
    err
}

struct Route {
    filter: Box<dyn crate::dispatching::filters::Filter>,
    handler: Box<dyn Handler>,
}

struct RouterInner {
    routes: HashMap<UpdateKey, Vec<Route>>,
    middlewares: Arc<[Arc<dyn RouterMiddleware>]>,
    error_handler: ErrorHandler,
}

/// The router itself: an update-subtype keyed handler table, router-entry
/// middleware and a single error handler. Built via [`RouterBuilder`] and
/// read-only once constructed (§5). Cheap to clone, like [`crate::Bot`].
#[derive(Clone)]
pub struct Router {
    inner: Arc<RouterInner>,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Classifies `update`, dispatches to the first matching handler for
    /// its subtype, and routes any error through the error handler. A
    /// subtype with no registered routes is skipped entirely (§4.7's
    /// "pre-evaluated, skip-if-absent" optimization) — no predicate in an
    /// empty route list is ever evaluated.
    pub async fn dispatch(&self, update: Update) -> crate::Result<()> {
        let update = Arc::new(update);
        let inner = self.inner.clone();
        let raw: Arc<RawDispatch> = Arc::new(move |update: Arc<Update>| {
            let inner = inner.clone();
            Box::pin(async move {
                let Some(key) = UpdateKey::of(&update) else { return Ok(()) };
                let Some(routes) = inner.routes.get(&key) else { return Ok(()) };
                for route in routes {
                    match route.filter.test(&update) {
                        Ok(true) => {
                            return route
                                .handler
                                .call(update.clone())
                                .await
                                .map_err(|e| (inner.error_handler)(&update, e));
                        }
                        Ok(false) => continue,
                        Err(e) => return Err((inner.error_handler)(&update, e)),
                    }
                }
                Ok(())
            }) as BoxFuture<crate::Result<()>>
        });
        let next = RouterNext { middlewares: self.inner.middlewares.clone(), index: 0, raw };
        next.run(update).await
    }
}

/// Accumulates routes, middleware and an error handler into a [`Router`].
pub struct RouterBuilder {
    routes: HashMap<UpdateKey, Vec<Route>>,
    middlewares: Vec<Arc<dyn RouterMiddleware>>,
    error_handler: ErrorHandler,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), middlewares: Vec::new(), error_handler: Arc::new(default_error_handler) }
    }

    pub fn on(
        mut self,
        key: UpdateKey,
        filter: impl crate::dispatching::filters::Filter + 'static,
        handler: impl Handler + 'static,
    ) -> Self {
        self.routes.entry(key).or_default().push(Route { filter: Box::new(filter), handler: Box::new(handler) });
        self
    }

    pub fn with_middleware(mut self, middleware: impl RouterMiddleware + 'static) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    pub fn error_handler(
        mut self,
        handler: impl Fn(&Update, crate::Error) -> crate::Error + Send + Sync + 'static,
    ) -> Self {
        self.error_handler = Arc::new(handler);
        self
    }

    pub fn build(self) -> Router {
        Router {
            inner: Arc::new(RouterInner {
                routes: self.routes,
                middlewares: Arc::from(self.middlewares),
                error_handler: self.error_handler,
            }),
        }
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::dispatching::filters::Command;

    fn message_update(text: &str) -> Update {
        serde_json::from_value(serde_json::json!({
            "update_id": 1,
            "message": {
                "message_id": 1,
                "date": 1700000000,
                "chat": {"id": 1, "type": "private"},
                "text": text,
            },
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn matching_route_invokes_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_inner = calls.clone();
        let router = Router::builder()
            .on(UpdateKey::Message, Command::new("start"), move |_u: Arc<Update>| {
                let calls = calls_inner.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .build();

        router.dispatch(message_update("/start")).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_matching_predicate_drops_update_silently() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_inner = calls.clone();
        let router = Router::builder()
            .on(UpdateKey::Message, Command::new("start"), move |_u: Arc<Update>| {
                let calls = calls_inner.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .build();

        router.dispatch(message_update("/stop")).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unregistered_subtype_is_skipped_without_evaluating_predicates() {
        let router = Router::builder().build();
        let update: Update = serde_json::from_value(serde_json::json!({"update_id": 1})).unwrap();
        router.dispatch(update).await.unwrap();
    }

    struct FailingFilter;

    impl crate::dispatching::filters::Filter for FailingFilter {
        fn test(&self, _update: &Update) -> crate::Result<bool> {
            Err(crate::Error::Config("predicate blew up".to_owned()))
        }
    }

    #[tokio::test]
    async fn predicate_error_routes_through_the_error_handler_instead_of_the_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_inner = calls.clone();
        let router = Router::builder()
            .on(UpdateKey::Message, FailingFilter, move |_u: Arc<Update>| {
                let calls = calls_inner.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .error_handler(|_update, err| {
                crate::Error::Config(format!("wrapped: {err}"))
            })
            .build();

        let err = router.dispatch(message_update("/start")).await.unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(err.to_string().contains("wrapped: configuration error: predicate blew up"));
    }
}
