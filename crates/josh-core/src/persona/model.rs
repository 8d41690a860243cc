//! Persona domain model.
//!
//! A persona defines the character the assistant speaks as: its role,
//! background, communication style, and the greeting that opens every
//! conversation.

use serde::{Deserialize, Serialize};

/// The character the assistant embodies in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    /// Display name of the persona
    pub name: String,
    /// Role or title describing the persona
    pub role: String,
    /// Background description of the persona's character
    pub background: String,
    /// Communication style characteristics
    pub communication_style: String,
    /// Greeting that seeds every new conversation
    pub greeting: String,
}
