pub mod agent;
pub mod chain;
pub mod openai_api_agent;

pub use agent::{AgentError, CompletionAgent};
pub use chain::ConversationChain;
pub use openai_api_agent::{DEFAULT_OPENAI_MODEL, OpenAIApiAgent};

use std::sync::Arc;

use josh_core::persona::Persona;
use josh_core::session::{ConversationMessage, MessageRole, Transcript};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

/// Instructional message shown when no credential is available.
const MISSING_KEY_HINT: &str = "Please add your OpenAI API key to continue. Set the \
    OPENAI_API_KEY environment variable or add it to ~/.config/josh/secret.json.";

/// Result of handling one user utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionResult {
    /// Nothing happened (blank input).
    NoOp,
    /// The exchange succeeded; the new human and assistant turns, in order.
    NewTurns(Vec<ConversationMessage>),
    /// No credential was available; no call was attempted.
    MissingCredential(String),
    /// The completion service failed; message for the generic error surface.
    Failed(String),
}

/// Holds one user session: the full transcript and a cached conversation
/// chain, so repeated interactions neither recreate the backend client nor
/// lose history.
pub struct ChatSession {
    session_id: String,
    created_at: String,
    persona: Persona,
    model: String,
    transcript: RwLock<Transcript>,
    /// Lazily-initialized chain, memoized for the session lifetime
    chain: Mutex<Option<Arc<ConversationChain>>>,
}

impl ChatSession {
    /// Creates a new session whose transcript is seeded with the persona's
    /// greeting.
    pub fn new_session(persona: Persona) -> Self {
        Self::build(persona, None)
    }

    /// Creates a session bound to an explicit completion backend.
    ///
    /// The chain cache is pre-filled, so no credential is needed.
    pub fn with_backend(persona: Persona, agent: Box<dyn CompletionAgent>) -> Self {
        let chain = Arc::new(ConversationChain::new(agent, persona.clone()));
        Self::build(persona, Some(chain))
    }

    fn build(persona: Persona, chain: Option<Arc<ConversationChain>>) -> Self {
        let mut transcript = Transcript::new();
        transcript.append(MessageRole::Assistant, persona.greeting.clone());

        Self {
            session_id: Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            persona,
            model: DEFAULT_OPENAI_MODEL.to_string(),
            transcript: RwLock::new(transcript),
            chain: Mutex::new(chain),
        }
    }

    /// Overrides the completion model used when the chain is first built.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Returns the memoized conversation chain, building it on first use.
    ///
    /// Calling this twice in one session yields the same cached instance;
    /// the credential is only read when the chain is actually constructed.
    pub async fn ensure_chain(&self, api_key: &str) -> Arc<ConversationChain> {
        let mut chain_guard = self.chain.lock().await;
        if let Some(chain) = chain_guard.as_ref() {
            debug!(session_id = %self.session_id, "reusing cached conversation chain");
            return Arc::clone(chain);
        }

        let agent = OpenAIApiAgent::new(api_key, self.model.clone());
        let chain = Arc::new(ConversationChain::new(Box::new(agent), self.persona.clone()));
        *chain_guard = Some(Arc::clone(&chain));
        chain
    }

    /// Appends a turn to the transcript. Pure append, no validation.
    pub async fn append_turn(&self, role: MessageRole, content: impl Into<String>) {
        self.transcript.write().await.append(role, content);
    }

    /// Returns a snapshot of the full transcript, in insertion order.
    ///
    /// Has no side effect on session state; callers may iterate the snapshot
    /// any number of times.
    pub async fn turns(&self) -> Vec<ConversationMessage> {
        self.transcript.read().await.messages().to_vec()
    }

    /// Handles one user utterance: the whole request/response cycle.
    ///
    /// With no credential and no cached chain, no network call occurs and
    /// the transcript is left unchanged.
    pub async fn handle_input(&self, input: &str, api_key: Option<&str>) -> InteractionResult {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return InteractionResult::NoOp;
        }

        let cached = self.chain.lock().await.clone();
        let chain = match (cached, api_key) {
            (Some(chain), _) => chain,
            (None, Some(key)) => self.ensure_chain(key).await,
            (None, None) => {
                return InteractionResult::MissingCredential(MISSING_KEY_HINT.to_string());
            }
        };

        self.append_turn(MessageRole::Human, trimmed).await;

        match chain.invoke(trimmed).await {
            Ok(response) => {
                self.append_turn(MessageRole::Assistant, response).await;

                let transcript = self.transcript.read().await;
                let new_turns = transcript.messages()[transcript.len() - 2..].to_vec();
                InteractionResult::NewTurns(new_turns)
            }
            Err(err) => {
                warn!(session_id = %self.session_id, error = %err, "completion call failed");
                InteractionResult::Failed(err.to_string())
            }
        }
    }
}
