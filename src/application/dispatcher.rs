//! Request dispatcher.
//!
//! An explicit registry mapping each request type to exactly one handler
//! factory, filled at startup. Dispatching a request:
//!
//! 1. runs the validation gate
//! 2. opens a fresh [`RepositoryScope`] for the request
//! 3. builds the handler from its factory with that scope
//! 4. awaits the handler
//!
//! The scope, and any transaction still open in it, is dropped when the
//! request finishes or is abandoned.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::validation::{ensure_valid, Validate};
use crate::domain::foundation::DomainError;
use crate::ports::{RepositoryScope, RepositoryScopeFactory};

/// A command or query value.
pub trait Request: Validate + Send + 'static {
    /// Success value returned by the handler.
    type Output: Send + 'static;

    /// Name used in logs and registry errors.
    const NAME: &'static str;
}

/// Executes one use case.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    async fn handle(&self, request: R) -> Result<R::Output, DomainError>;
}

type HandlerFactory<R> =
    Arc<dyn Fn(&RepositoryScope) -> Box<dyn RequestHandler<R>> + Send + Sync>;

/// Registry of request handlers.
pub struct Dispatcher {
    scopes: Arc<dyn RepositoryScopeFactory>,
    factories: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Dispatcher {
    pub fn new(scopes: Arc<dyn RepositoryScopeFactory>) -> Self {
        Self {
            scopes,
            factories: HashMap::new(),
        }
    }

    /// Registers the handler for `R`.
    ///
    /// # Errors
    ///
    /// - `InternalError` if `R` already has a handler
    pub fn register<R, H, F>(&mut self, factory: F) -> Result<(), DomainError>
    where
        R: Request,
        H: RequestHandler<R> + 'static,
        F: Fn(&RepositoryScope) -> H + Send + Sync + 'static,
    {
        let key = TypeId::of::<R>();
        if self.factories.contains_key(&key) {
            return Err(DomainError::internal(format!(
                "A handler for {} is already registered",
                R::NAME
            )));
        }

        let factory: HandlerFactory<R> = Arc::new(move |scope: &RepositoryScope| {
            Box::new(factory(scope)) as Box<dyn RequestHandler<R>>
        });
        self.factories.insert(key, Box::new(factory));
        Ok(())
    }

    pub fn is_registered<R: Request>(&self) -> bool {
        self.factories.contains_key(&TypeId::of::<R>())
    }

    /// Number of registered request types.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Routes `request` to its handler.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the validation gate rejects the request
    /// - `InternalError` if no handler is registered for `R`
    /// - whatever the handler returns
    pub async fn send<R: Request>(&self, request: R) -> Result<R::Output, DomainError> {
        ensure_valid(&request).map_err(|err| {
            tracing::debug!(request = R::NAME, error = %err, "Request rejected by validation");
            err
        })?;

        let factory = self
            .factories
            .get(&TypeId::of::<R>())
            .and_then(|f| f.downcast_ref::<HandlerFactory<R>>())
            .cloned()
            .ok_or_else(|| {
                DomainError::internal(format!("No handler registered for {}", R::NAME))
            })?;

        let scope = self.scopes.open_scope();
        let handler = factory(&scope);

        tracing::debug!(request = R::NAME, "Dispatching request");
        let result = handler.handle(request).await;
        if let Err(err) = &result {
            tracing::debug!(request = R::NAME, code = %err.code, "Request failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::domain::foundation::{ErrorCode, FieldError};

    struct Ping {
        message: String,
    }

    impl Validate for Ping {
        fn validate(&self) -> Vec<FieldError> {
            if self.message.is_empty() {
                vec![FieldError::new("message", "is required")]
            } else {
                vec![]
            }
        }
    }

    impl Request for Ping {
        type Output = String;
        const NAME: &'static str = "Ping";
    }

    struct PingHandler;

    #[async_trait]
    impl RequestHandler<Ping> for PingHandler {
        async fn handle(&self, request: Ping) -> Result<String, DomainError> {
            Ok(format!("pong: {}", request.message))
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn routes_to_registered_handler() {
        let mut dispatcher = dispatcher();
        dispatcher.register::<Ping, _, _>(|_| PingHandler).unwrap();

        let reply = dispatcher
            .send(Ping {
                message: "hi".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(reply, "pong: hi");
        assert!(dispatcher.is_registered::<Ping>());
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let mut dispatcher = dispatcher();
        dispatcher.register::<Ping, _, _>(|_| PingHandler).unwrap();

        let err = dispatcher.register::<Ping, _, _>(|_| PingHandler).unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(dispatcher.len(), 1);
    }

    #[tokio::test]
    async fn invalid_request_never_reaches_handler() {
        struct ExplodingHandler;

        #[async_trait]
        impl RequestHandler<Ping> for ExplodingHandler {
            async fn handle(&self, _request: Ping) -> Result<String, DomainError> {
                panic!("handler must not run");
            }
        }

        let mut dispatcher = dispatcher();
        dispatcher.register::<Ping, _, _>(|_| ExplodingHandler).unwrap();

        let err = dispatcher
            .send(Ping {
                message: String::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.detail("message"), Some("is required"));
    }

    #[tokio::test]
    async fn unregistered_request_is_internal_error() {
        let err = dispatcher()
            .send(Ping {
                message: "hi".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalError);
    }
}
