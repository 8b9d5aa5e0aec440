use std::sync::Arc;

use sessions::SessionStore;
use shared::{
    domain::{ChatId, ClassName, Sender, UserId},
    protocol::{Attachment, BotCommand, InboundEvent, MessageContent, Reply},
};
use thiserror::Error;
use tracing::{debug, error, warn};

pub mod catalog;
pub mod replies;
pub mod submission;

pub use catalog::{ClassCatalog, ClassEntry, CatalogError, CLASS_TOKEN_PREFIX};
pub use submission::{
    MemorySubmissionLog, SubmissionError, SubmissionLog, SubmissionRecord, TracingSubmissionLog,
};

/// Everything the submission handlers need: the class catalog, the session
/// store they read and write, and the log accepted submissions go to.
#[derive(Clone)]
pub struct Workflow {
    pub catalog: ClassCatalog,
    pub sessions: Arc<dyn SessionStore>,
    pub log: Arc<dyn SubmissionLog>,
}

impl Workflow {
    pub fn new(
        catalog: ClassCatalog,
        sessions: Arc<dyn SessionStore>,
        log: Arc<dyn SubmissionLog>,
    ) -> Self {
        Self {
            catalog,
            sessions,
            log,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("unknown class token '{0}'")]
    UnknownClass(String),
}

/// Routes a classified event to its handler.
pub async fn dispatch(ctx: &Workflow, event: InboundEvent) -> Reply {
    debug!(user_id = %event.sender().user_id, chat_id = %event.chat_id(), "handling event");
    match event {
        InboundEvent::Command { command, chat_id, .. } => match command {
            BotCommand::Start => handle_start(ctx),
            BotCommand::Help => handle_help(),
            BotCommand::GetId => handle_get_id(chat_id),
        },
        InboundEvent::ButtonPress { sender, token, .. } => {
            handle_class_selection(ctx, sender.user_id, &token).await
        }
        InboundEvent::Message {
            sender, content, ..
        } => match content {
            MessageContent::Text { .. } => handle_text(ctx, sender.user_id).await,
            MessageContent::Attachment { attachment } => {
                handle_file_upload(ctx, &sender, attachment).await
            }
        },
    }
}

pub fn handle_start(ctx: &Workflow) -> Reply {
    Reply::text(replies::WELCOME_WITH_CHOICES).with_choices(ctx.catalog.choices())
}

pub fn handle_help() -> Reply {
    Reply::text(replies::HELP)
}

pub fn handle_get_id(chat_id: ChatId) -> Reply {
    Reply::text(replies::chat_id(chat_id)).markdown()
}

pub async fn handle_class_selection(ctx: &Workflow, user_id: UserId, token: &str) -> Reply {
    match select_class(ctx, user_id, token).await {
        Ok(class) => Reply::text(replies::class_selected(&class)).editing_source(),
        Err(err) => {
            warn!(%user_id, %err, "ignoring class selection");
            Reply::text(replies::UNKNOWN_CLASS)
        }
    }
}

/// Decodes `token` and stores the class as the user's selection.
pub async fn select_class(
    ctx: &Workflow,
    user_id: UserId,
    token: &str,
) -> Result<ClassName, SelectionError> {
    let entry = ctx
        .catalog
        .decode_token(token)
        .ok_or_else(|| SelectionError::UnknownClass(token.to_string()))?;
    ctx.sessions.set(user_id, entry.name.clone()).await;
    debug!(%user_id, class = %entry.name, "class selected");
    Ok(entry.name.clone())
}

pub async fn handle_file_upload(ctx: &Workflow, sender: &Sender, attachment: Attachment) -> Reply {
    match submit_file(ctx, sender, attachment).await {
        Ok(record) => Reply::text(replies::submission_received(
            &record.class,
            &record.filename,
            &record.student,
        )),
        Err(SubmissionError::MissingSelection) => Reply::text(replies::SELECT_CLASS_FIRST),
        Err(SubmissionError::UnsupportedAttachment { kind }) => {
            warn!(user_id = %sender.user_id, %kind, "rejected unsupported attachment");
            Reply::text(replies::UNSUPPORTED_ATTACHMENT)
        }
        Err(err @ SubmissionError::RecordingFailed(_)) => {
            error!(user_id = %sender.user_id, error = %err, "error processing assignment");
            Reply::text(replies::SUBMISSION_FAILED)
        }
    }
}

/// Accepts an attachment under the sender's selected class.
///
/// Nothing is recorded unless the sender has a selection and the attachment
/// is a document or photo. The session is left as it was in every case.
pub async fn submit_file(
    ctx: &Workflow,
    sender: &Sender,
    attachment: Attachment,
) -> Result<SubmissionRecord, SubmissionError> {
    let class = ctx
        .sessions
        .get(sender.user_id)
        .await
        .ok_or(SubmissionError::MissingSelection)?;

    let filename = match attachment {
        Attachment::Document { filename } => filename,
        Attachment::Photo => replies::photo_filename(&sender.display_name),
        Attachment::Unsupported { kind } => {
            return Err(SubmissionError::UnsupportedAttachment { kind })
        }
    };

    let record = SubmissionRecord::new(sender.user_id, &sender.display_name, class, filename);
    ctx.log
        .record(&record)
        .map_err(SubmissionError::RecordingFailed)?;
    Ok(record)
}

pub async fn handle_text(ctx: &Workflow, user_id: UserId) -> Reply {
    if ctx.sessions.get(user_id).await.is_some() {
        Reply::text(replies::UPLOAD_NUDGE)
    } else {
        Reply::text(replies::GENERIC_WELCOME)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
