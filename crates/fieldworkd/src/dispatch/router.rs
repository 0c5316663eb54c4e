//! Action routing for command dispatch.
//!
//! The registry maps each [`Action`] to its handler and is built once at
//! startup. The router parses the control line, looks the action up, and lets
//! the handler produce exactly one [`Reply`]. Unparseable lines and unknown
//! actions yield `ERROR_UNKNOWN_ACTION`.

use std::collections::HashMap;
use std::fmt;
use std::io::BufRead;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::lifecycle::TicketService;

use super::action::Action;
use super::actions;
use super::errors::DispatchError;
use super::request::{ActionRequest, Arguments, CommandLine};
use super::response::{Reply, ResponseToken};

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Signature shared by the built-in action implementations.
pub(crate) type ActionFn =
    fn(&dyn TicketService, &mut ActionRequest<'_>) -> Result<Reply, DispatchError>;

/// Handles one action. Implementations never fail: every error becomes the
/// action's terminal token.
pub trait ActionHandler: Send + Sync {
    fn handle(&self, request: &mut ActionRequest<'_>) -> Reply;
}

/// Adapts an [`ActionFn`] over a shared service into an [`ActionHandler`].
struct ServiceHandler {
    action: Action,
    service: Arc<dyn TicketService>,
    run: ActionFn,
}

impl ActionHandler for ServiceHandler {
    fn handle(&self, request: &mut ActionRequest<'_>) -> Reply {
        match (self.run)(self.service.as_ref(), request) {
            Ok(reply) => reply,
            Err(error) => {
                warn!(
                    target: DISPATCH_TARGET,
                    action = %self.action,
                    %error,
                    "action failed"
                );
                Reply::token(self.action.failure_token())
            }
        }
    }
}

/// Lookup table from action to handler.
#[derive(Default)]
pub struct ActionRegistry {
    handlers: HashMap<Action, Box<dyn ActionHandler>>,
}

impl ActionRegistry {
    /// Registry with every built-in action bound to `service`.
    #[must_use]
    pub fn standard(service: Arc<dyn TicketService>) -> Self {
        let mut registry = Self::default();
        for (action, run) in actions::STANDARD {
            registry.register(
                action,
                ServiceHandler {
                    action,
                    service: Arc::clone(&service),
                    run,
                },
            );
        }
        registry
    }

    /// Binds `handler` to `action`, replacing any previous binding.
    pub fn register(&mut self, action: Action, handler: impl ActionHandler + 'static) -> &mut Self {
        self.handlers.insert(action, Box::new(handler));
        self
    }

    fn get(&self, action: Action) -> Option<&dyn ActionHandler> {
        self.handlers.get(&action).map(AsRef::as_ref)
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_set()
            .entries(self.handlers.keys())
            .finish()
    }
}

/// Routes control lines to registered handlers.
#[derive(Debug)]
pub struct ActionRouter {
    registry: ActionRegistry,
}

impl ActionRouter {
    #[must_use]
    pub const fn new(registry: ActionRegistry) -> Self {
        Self { registry }
    }

    /// Produces the reply for one control line. `payload` is the remainder of
    /// the connection, positioned just after the line.
    pub fn dispatch(&self, line: &[u8], payload: &mut dyn BufRead) -> Reply {
        let command = match CommandLine::parse(line) {
            Ok(command) => command,
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "malformed request");
                return Reply::token(ResponseToken::UnknownAction);
            }
        };
        let action = match Action::parse(command.action()) {
            Ok(action) => action,
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "unknown action");
                return Reply::token(ResponseToken::UnknownAction);
            }
        };
        let Some(handler) = self.registry.get(action) else {
            warn!(target: DISPATCH_TARGET, %action, "no handler registered");
            return Reply::token(ResponseToken::UnknownAction);
        };
        debug!(
            target: DISPATCH_TARGET,
            %action,
            arguments = command.arguments().len(),
            "dispatching request"
        );
        let mut request = ActionRequest::new(Arguments::new(action, command.arguments()), payload);
        handler.handle(&mut request)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::lifecycle::MockTicketService;

    struct Fixed(Reply);

    impl ActionHandler for Fixed {
        fn handle(&self, _request: &mut ActionRequest<'_>) -> Reply {
            self.0.clone()
        }
    }

    fn route(router: &ActionRouter, line: &[u8]) -> Reply {
        router.dispatch(line, &mut Cursor::new(Vec::new()))
    }

    #[test]
    fn unknown_actions_get_the_generic_token() {
        let router = ActionRouter::new(ActionRegistry::standard(Arc::new(MockTicketService::new())));
        assert_eq!(route(&router, b"FROBNICATE|x"), Reply::token(ResponseToken::UnknownAction));
        assert_eq!(route(&router, b""), Reply::token(ResponseToken::UnknownAction));
    }

    #[test]
    fn unregistered_actions_are_unknown() {
        let router = ActionRouter::new(ActionRegistry::default());
        assert_eq!(route(&router, b"LOGIN|a|b"), Reply::token(ResponseToken::UnknownAction));
    }

    #[test]
    fn registered_handlers_receive_their_action() {
        let mut registry = ActionRegistry::default();
        registry.register(Action::History, Fixed(Reply::Json("[]".to_owned())));
        let router = ActionRouter::new(registry);
        assert_eq!(route(&router, b"history|ana"), Reply::Json("[]".to_owned()));
    }

    #[test]
    fn argument_errors_become_the_action_failure_token() {
        let router = ActionRouter::new(ActionRegistry::standard(Arc::new(MockTicketService::new())));
        assert_eq!(route(&router, b"LOGIN|only-one"), Reply::token(ResponseToken::LoginError));
        assert_eq!(route(&router, b"START|ana|x|1|2|now"), Reply::token(ResponseToken::StartError));
    }
}
