pub mod gateway;
pub mod observability;
pub mod openai;
pub mod prompts;

pub use gateway::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatRole, LlmGateway,
    LlmGatewayError, LlmGatewayFuture, LlmTokenUsage,
};
pub use observability::{LlmTelemetryEvent, complete_with_telemetry};
pub use openai::{OpenAiConfigError, OpenAiGateway, OpenAiGatewayConfig};
pub use prompts::{HEALTHCARE_SYSTEM_PROMPT, system_prompt_for};
