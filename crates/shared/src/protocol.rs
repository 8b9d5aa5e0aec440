use serde::{Deserialize, Serialize};

use crate::domain::{ChatId, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotCommand {
    Start,
    Help,
    #[serde(rename = "getid")]
    GetId,
}

/// An inbound update, already classified by the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum InboundEvent {
    Command {
        chat_id: ChatId,
        sender: Sender,
        command: BotCommand,
    },
    ButtonPress {
        chat_id: ChatId,
        sender: Sender,
        token: String,
    },
    Message {
        chat_id: ChatId,
        sender: Sender,
        content: MessageContent,
    },
}

impl InboundEvent {
    pub fn sender(&self) -> &Sender {
        match self {
            Self::Command { sender, .. }
            | Self::ButtonPress { sender, .. }
            | Self::Message { sender, .. } => sender,
        }
    }

    pub fn chat_id(&self) -> ChatId {
        match self {
            Self::Command { chat_id, .. }
            | Self::ButtonPress { chat_id, .. }
            | Self::Message { chat_id, .. } => *chat_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageContent {
    Text { body: String },
    Attachment { attachment: Attachment },
}

/// Shape of an uploaded attachment. Only the metadata crosses the boundary;
/// file content stays with the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Attachment {
    Document { filename: String },
    Photo,
    /// Anything else the transport received, e.g. `audio` or `sticker`.
    Unsupported {
        #[serde(rename = "media")]
        kind: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyFormat {
    #[default]
    Plain,
    Markdown,
}

/// Whether a reply is sent as a new message or replaces the message whose
/// button produced the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    #[default]
    Send,
    EditSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub format: ReplyFormat,
    #[serde(default)]
    pub delivery: Delivery,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choices: Vec::new(),
            format: ReplyFormat::Plain,
            delivery: Delivery::Send,
        }
    }

    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }

    pub fn markdown(mut self) -> Self {
        self.format = ReplyFormat::Markdown;
        self
    }

    pub fn editing_source(mut self) -> Self {
        self.delivery = Delivery::EditSource;
        self
    }
}
