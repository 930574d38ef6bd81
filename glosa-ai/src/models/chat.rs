//! Chat messages and assistant personas

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix marking a synthesized error entry in the chat list
pub const ERROR_PREFIX: &str = "❌";

/// Response style selecting which system instruction is sent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    #[default]
    Professional,
    Witty,
    Angry,
    Poet,
    Politician,
    Philosopher,
    Scientist,
    Artist,
    Teacher,
    Friend,
}

impl Persona {
    pub const ALL: [Persona; 10] = [
        Persona::Professional,
        Persona::Witty,
        Persona::Angry,
        Persona::Poet,
        Persona::Politician,
        Persona::Philosopher,
        Persona::Scientist,
        Persona::Artist,
        Persona::Teacher,
        Persona::Friend,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Persona::Professional => "professional",
            Persona::Witty => "witty",
            Persona::Angry => "angry",
            Persona::Poet => "poet",
            Persona::Politician => "politician",
            Persona::Philosopher => "philosopher",
            Persona::Scientist => "scientist",
            Persona::Artist => "artist",
            Persona::Teacher => "teacher",
            Persona::Friend => "friend",
        }
    }

    /// Label shown in the persona picker
    pub fn label(&self) -> &'static str {
        match self {
            Persona::Professional => "專業",
            Persona::Witty => "詼諧",
            Persona::Angry => "憤怒",
            Persona::Poet => "詩人",
            Persona::Politician => "政客",
            Persona::Philosopher => "哲學家",
            Persona::Scientist => "科學家",
            Persona::Artist => "藝術家",
            Persona::Teacher => "老師",
            Persona::Friend => "朋友",
        }
    }

    /// Accepts either the slug (case-insensitive) or the picker label
    pub fn parse(name: &str) -> Option<Persona> {
        let name = name.trim();
        Persona::ALL
            .into_iter()
            .find(|p| p.slug().eq_ignore_ascii_case(name) || p.label() == name)
    }
}

/// One entry of the chat list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub content: String,
    pub is_user: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self::build(content.to_string(), true, None)
    }

    pub fn reply(content: String, persona: &str) -> Self {
        Self::build(content, false, Some(persona.to_string()))
    }

    pub fn error(message: &str) -> Self {
        Self::build(format!("{} {}", ERROR_PREFIX, message), false, None)
    }

    pub fn is_error(&self) -> bool {
        !self.is_user && self.content.starts_with(ERROR_PREFIX)
    }

    fn build(content: String, is_user: bool, persona: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            is_user,
            persona,
            timestamp: glosa_common::time::now(),
        }
    }
}
