use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use api_server::http::{AppState, build_router};
use shared::config::{ApiConfig, load_dotenv};
use shared::health_assistant::{ConversationStore, HealthQueryResponder};
use shared::llm::OpenAiGateway;
use shared::repos::Store;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(err) = load_dotenv() {
        eprintln!("{err}");
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "api_server=debug,shared=info,axum=info".to_string()),
        )
        .init();

    let config = match ApiConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("failed to read config: {err}");
            std::process::exit(1);
        }
    };

    let store = match config.database_url.as_deref() {
        Some(database_url) => {
            match Store::connect(database_url, config.database_max_connections).await {
                Ok(store) => Some(store),
                Err(err) => {
                    error!("failed to connect to postgres: {err}");
                    std::process::exit(1);
                }
            }
        }
        None => {
            warn!("DATABASE_URL is not set; chat replies will not be personalized");
            None
        }
    };

    let conversations = ConversationStore::new(config.chat.conversation_limits());
    let _pruner = conversations.spawn_pruner(Duration::from_secs(
        config.chat.caller_prune_interval_seconds,
    ));

    let mut responder = HealthQueryResponder::new(conversations, config.chat.responder_settings());
    match config.openai.clone() {
        Some(openai_config) => match OpenAiGateway::new(openai_config) {
            Ok(gateway) => {
                info!(model = gateway.model(), "llm fallback enabled");
                responder = responder.with_llm_gateway(Arc::new(gateway));
            }
            Err(err) => {
                error!("failed to initialize llm gateway: {err}");
                std::process::exit(1);
            }
        },
        None => warn!("OPENAI_API_KEY is not set; unmatched questions get the fallback reply"),
    }
    if let Some(store) = store.clone() {
        responder = responder.with_identity_resolver(Arc::new(store));
    }

    let app = build_router(AppState {
        responder,
        store,
        jwt_secret: config.jwt_secret,
    });

    let addr: SocketAddr = match config.bind_addr.parse() {
        Ok(addr) => addr,
        Err(err) => {
            error!(error = %err, bind_addr = %config.bind_addr, "invalid bind addr");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, bind_addr = %addr, "failed to bind api listener");
            std::process::exit(1);
        }
    };

    info!(
        "api server listening on {}",
        listener.local_addr().unwrap_or(addr)
    );
    if let Err(err) = axum::serve(listener, app).await {
        error!(error = %err, "api server failed");
        std::process::exit(1);
    }
}
