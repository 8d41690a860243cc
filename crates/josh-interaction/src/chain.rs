//! Conversation chain: persona prompt + windowed history + completion backend.
//!
//! `invoke` formats at most the last K remembered turns behind the fixed
//! persona instruction, executes one completion call, and records the new
//! human/assistant pair into the window.

use josh_core::memory::BufferWindowMemory;
use josh_core::persona::Persona;
use josh_core::session::{ConversationMessage, MessageRole};
use tokio::sync::Mutex;
use tracing::debug;

use crate::agent::{AgentError, CompletionAgent};

/// One persona-bound conversation with a completion backend.
pub struct ConversationChain {
    agent: Box<dyn CompletionAgent>,
    persona: Persona,
    memory: Mutex<BufferWindowMemory>,
}

impl ConversationChain {
    /// Creates a chain with the default window size.
    pub fn new(agent: Box<dyn CompletionAgent>, persona: Persona) -> Self {
        Self::with_memory(agent, persona, BufferWindowMemory::new())
    }

    /// Creates a chain with an explicit window memory.
    pub fn with_memory(
        agent: Box<dyn CompletionAgent>,
        persona: Persona,
        memory: BufferWindowMemory,
    ) -> Self {
        Self {
            agent,
            persona,
            memory: Mutex::new(memory),
        }
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Runs one exchange: windowed history plus `input` in, assistant text out.
    ///
    /// The window is only updated after a successful call, so a failed
    /// exchange leaves the remembered history untouched.
    pub async fn invoke(&self, input: &str) -> Result<String, AgentError> {
        let prompt = {
            let memory = self.memory.lock().await;
            build_prompt(&self.persona, memory.window(), input)
        };

        debug!(
            backend = self.agent.describe(),
            prompt_chars = prompt.len(),
            "invoking completion backend"
        );

        let response = self.agent.complete(prompt).await?;

        let mut memory = self.memory.lock().await;
        memory.record(MessageRole::Human, input);
        memory.record(MessageRole::Assistant, response.clone());

        Ok(response)
    }

    /// Number of turns currently remembered by the window.
    pub async fn remembered_turns(&self) -> usize {
        self.memory.lock().await.len()
    }
}

fn history_label(role: MessageRole) -> &'static str {
    match role {
        MessageRole::Human => "Human",
        MessageRole::Assistant => "AI",
    }
}

/// Formats the fixed persona instruction, the greeting, the windowed history,
/// and the new utterance into a single prompt.
fn build_prompt<'a>(
    persona: &Persona,
    history: impl Iterator<Item = &'a ConversationMessage>,
    input: &str,
) -> String {
    let mut conversation = format!("AI: {}\n", persona.greeting);
    for message in history {
        conversation.push_str(history_label(message.role));
        conversation.push_str(": ");
        conversation.push_str(&message.content);
        conversation.push('\n');
    }

    format!(
        "# Persona Profile\n\
         **Name**: {name}\n\
         **Role**: {role}\n\
         \n\
         ## Background\n\
         {background}\n\
         \n\
         ## Communication Style\n\
         {style}\n\
         \n\
         # Current Conversation\n\
         {conversation}\n\
         Human: {input}",
        name = persona.name,
        role = persona.role,
        background = persona.background,
        style = persona.communication_style,
        conversation = conversation,
        input = input,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use josh_core::persona::default_persona;
    use std::sync::Arc;

    /// Test backend that records every prompt and answers from a script.
    struct ScriptedAgent {
        prompts: Arc<Mutex<Vec<String>>>,
        responses: Mutex<Vec<String>>,
    }

    impl ScriptedAgent {
        fn new(responses: Vec<&str>) -> Self {
            let mut responses: Vec<String> = responses.into_iter().map(String::from).collect();
            responses.reverse();
            Self {
                prompts: Arc::new(Mutex::new(Vec::new())),
                responses: Mutex::new(responses),
            }
        }

        fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
            Arc::clone(&self.prompts)
        }
    }

    #[async_trait::async_trait]
    impl CompletionAgent for ScriptedAgent {
        fn describe(&self) -> &str {
            "scripted test backend"
        }

        async fn complete(&self, prompt: String) -> Result<String, AgentError> {
            self.prompts.lock().await.push(prompt);
            self.responses
                .lock()
                .await
                .pop()
                .ok_or_else(|| AgentError::ExecutionFailed("script exhausted".into()))
        }
    }

    #[tokio::test]
    async fn test_invoke_records_exchange_in_window() {
        let agent = ScriptedAgent::new(vec!["Peace be with you"]);
        let chain = ConversationChain::new(Box::new(agent), default_persona());

        let response = chain.invoke("Hi").await.unwrap();

        assert_eq!(response, "Peace be with you");
        assert_eq!(chain.remembered_turns().await, 2);
    }

    #[tokio::test]
    async fn test_prompt_contains_persona_and_greeting() {
        let agent = ScriptedAgent::new(vec!["ok"]);
        let prompts = agent.prompts();
        let chain = ConversationChain::new(Box::new(agent), default_persona());

        chain.invoke("How do I pray?").await.unwrap();

        let recorded = prompts.lock().await;
        let prompt = recorded.last().unwrap();
        assert!(prompt.contains("**Name**: Josh"));
        assert!(prompt.contains("Hello, dear friend. How can I support you today?"));
        assert!(prompt.ends_with("Human: How do I pray?"));
    }

    #[tokio::test]
    async fn test_failed_call_leaves_window_untouched() {
        let agent = ScriptedAgent::new(vec![]);
        let chain = ConversationChain::new(Box::new(agent), default_persona());

        let result = chain.invoke("Hi").await;

        assert!(result.is_err());
        assert_eq!(chain.remembered_turns().await, 0);
    }

    #[tokio::test]
    async fn test_window_bounds_prompt_history() {
        let responses: Vec<String> = (1..=7).map(|i| format!("answer-{i}")).collect();
        let agent = ScriptedAgent::new(responses.iter().map(String::as_str).collect());
        let prompts = agent.prompts();
        let chain = ConversationChain::new(Box::new(agent), default_persona());

        // Six exchanges fill the window with 12 turns, of which 10 survive.
        for i in 1..=6 {
            chain.invoke(&format!("question-{i}")).await.unwrap();
        }
        chain.invoke("question-7").await.unwrap();

        let recorded = prompts.lock().await;
        let prompt = recorded.last().unwrap();
        assert!(!prompt.contains("question-1\n"));
        assert!(!prompt.contains("answer-1\n"));
        assert!(prompt.contains("Human: question-2"));
        assert!(prompt.contains("AI: answer-6"));
        assert!(prompt.ends_with("Human: question-7"));
    }

    #[test]
    fn test_build_prompt_with_empty_history() {
        let persona = default_persona();

        let prompt = build_prompt(&persona, std::iter::empty(), "Hi");

        assert!(prompt.contains("# Current Conversation\nAI: Hello, dear friend."));
        assert!(prompt.ends_with("\nHuman: Hi"));
    }
}
