//! AI capabilities: goal generation, entry parsing and the coach chat.
//!
//! Callers hold a [`WithFallback`] around whichever backend is available, so
//! every capability has a defined outcome when the service is unreachable.

mod fallback;
mod gemini;
mod offline;
mod traits;

pub use fallback::{
    WithFallback, CHAT_EMPTY_REPLY, CHAT_FAILED_REPLY, MAX_SUGGESTIONS, MIN_SUGGESTION_QUERY,
};
pub use gemini::GeminiClient;
pub use offline::OfflineService;
pub use traits::{
    AiService, ChatRole, ChatService, ChatTurn, EntryParser, ImageInput, PlanGenerator,
};

use tracing::{info, warn};

use crate::error::ServiceError;
use crate::storage::AiConfig;

/// Type-erased backend behind the fallback policy.
pub type DynAiService = WithFallback<Box<dyn AiService>>;

/// Build the backend described by `config`.
///
/// Uses Gemini when the API key variable is set, otherwise an offline backend
/// whose calls all resolve through the fallback policy.
pub fn from_config(config: &AiConfig) -> DynAiService {
    let backend: Box<dyn AiService> = match GeminiClient::from_config(config) {
        Ok(client) => Box::new(client),
        Err(ServiceError::NotConfigured { env_var }) => {
            info!(%env_var, "no API key set, AI features are offline");
            Box::new(OfflineService::new(env_var))
        }
        Err(e) => {
            warn!(error = %e, "could not build AI client, AI features are offline");
            Box::new(OfflineService::new(config.api_key_env.clone()))
        }
    };
    WithFallback::new(backend)
}
