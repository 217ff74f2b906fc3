//! The handler abstraction.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use super::error::HandlerError;
use super::reply::Reply;
use super::request::HttpRequest;

/// Either a reply to send or a failure for status translation to render.
pub type HandlerResult = Result<Reply, HandlerError>;

pub type HandlerFuture = BoxFuture<'static, HandlerResult>;

/// One request in, one outcome out. Handlers never write error bodies.
pub trait Handler: Send + Sync + 'static {
    fn serve(&self, req: HttpRequest) -> HandlerFuture;
}

pub type BoxHandler = Arc<dyn Handler>;

impl<F, Fut> Handler for F
where
    F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn serve(&self, req: HttpRequest) -> HandlerFuture {
        Box::pin(self(req))
    }
}
