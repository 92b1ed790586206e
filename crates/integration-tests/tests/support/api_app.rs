use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use api_server::http::{AppState, build_router};
use shared::health_assistant::{ConversationStore, HealthQueryResponder, ResponderSettings};
use shared::identity::StaticIdentityDirectory;
use shared::llm::{
    ChatCompletionRequest, ChatCompletionResponse, LlmGateway, LlmGatewayError, LlmGatewayFuture,
};

use super::session::TEST_JWT_SECRET;

/// Gateway double that counts calls and replies with a fixed text, or fails when none is set.
pub struct CountingGateway {
    reply: Option<&'static str>,
    calls: AtomicUsize,
}

impl CountingGateway {
    pub fn replying(reply: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LlmGateway for CountingGateway {
    fn complete<'a>(&'a self, _request: ChatCompletionRequest) -> LlmGatewayFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Some(reply) => Ok(ChatCompletionResponse {
                    model: "integration-test-model".to_string(),
                    provider_request_id: None,
                    content: reply.to_string(),
                    usage: None,
                }),
                None => Err(LlmGatewayError::ProviderFailure(
                    "status=502 code=bad_gateway".to_string(),
                )),
            }
        })
    }
}

pub fn build_test_router(gateway: Option<Arc<CountingGateway>>) -> axum::Router {
    let mut responder =
        HealthQueryResponder::new(ConversationStore::default(), ResponderSettings::default())
            .with_identity_resolver(Arc::new(
                StaticIdentityDirectory::new().with_user("patient-1", "Dana"),
            ));
    if let Some(gateway) = gateway {
        responder = responder.with_llm_gateway(gateway);
    }

    build_router(AppState {
        responder,
        store: None,
        jwt_secret: TEST_JWT_SECRET.to_string(),
    })
}
