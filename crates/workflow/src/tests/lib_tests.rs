use super::*;
use sessions::InMemorySessionStore;
use shared::protocol::Delivery;

struct FailingLog;

impl SubmissionLog for FailingLog {
    fn record(&self, _record: &SubmissionRecord) -> anyhow::Result<()> {
        anyhow::bail!("log sink unavailable")
    }
}

fn setup() -> (Workflow, Arc<InMemorySessionStore>, Arc<MemorySubmissionLog>) {
    let sessions = Arc::new(InMemorySessionStore::new());
    let log = Arc::new(MemorySubmissionLog::new());
    let ctx = Workflow::new(ClassCatalog::default(), sessions.clone(), log.clone());
    (ctx, sessions, log)
}

fn token(ctx: &Workflow, name: &str) -> String {
    ctx.catalog
        .token_for(&ClassName::new(name))
        .expect("known class")
}

fn document(filename: &str) -> Attachment {
    Attachment::Document {
        filename: filename.into(),
    }
}

#[tokio::test]
async fn upload_without_selection_is_rejected_and_records_nothing() {
    let (ctx, sessions, log) = setup();
    let sender = Sender::new(UserId(7), "Bob");

    let err = submit_file(&ctx, &sender, Attachment::Photo)
        .await
        .expect_err("should fail");
    assert!(matches!(err, SubmissionError::MissingSelection));

    let reply = handle_file_upload(&ctx, &sender, document("hw.pdf")).await;
    assert_eq!(reply.text, replies::SELECT_CLASS_FIRST);
    assert_eq!(sessions.get(UserId(7)).await, None);
    assert!(log.records().is_empty());
}

#[tokio::test]
async fn every_class_selection_is_stored_exactly() {
    let (ctx, sessions, _log) = setup();
    let names: Vec<ClassName> = ctx
        .catalog
        .entries()
        .iter()
        .map(|entry| entry.name.clone())
        .collect();

    for (index, name) in names.into_iter().enumerate() {
        let user = UserId(index as i64 + 100);
        let token = token(&ctx, name.as_str());
        handle_class_selection(&ctx, user, &token).await;
        assert_eq!(sessions.get(user).await, Some(name));
    }
}

#[tokio::test]
async fn reselecting_overwrites_previous_class() {
    let (ctx, sessions, _log) = setup();
    let user = UserId(1);
    handle_class_selection(&ctx, user, &token(&ctx, "Prosthodontics")).await;
    handle_class_selection(&ctx, user, &token(&ctx, "Basic Sciences")).await;
    assert_eq!(
        sessions.get(user).await,
        Some(ClassName::new("Basic Sciences"))
    );
}

#[tokio::test]
async fn selection_reply_confirms_class_and_edits_buttons() {
    let (ctx, _sessions, _log) = setup();
    let reply =
        handle_class_selection(&ctx, UserId(5), &token(&ctx, "Restorative & Aesthetic")).await;
    assert!(reply.text.contains("You selected: Restorative & Aesthetic"));
    assert!(reply.text.contains("upload your assignment file"));
    assert_eq!(reply.delivery, Delivery::EditSource);
}

#[tokio::test]
async fn unknown_token_leaves_session_untouched() {
    let (ctx, sessions, _log) = setup();
    let user = UserId(8);
    handle_class_selection(&ctx, user, &token(&ctx, "Orthodontics")).await;

    let err = select_class(&ctx, user, "class_dermatology")
        .await
        .expect_err("should fail");
    assert_eq!(err, SelectionError::UnknownClass("class_dermatology".into()));

    let reply = handle_class_selection(&ctx, user, "garbage").await;
    assert_eq!(reply.text, replies::UNKNOWN_CLASS);
    assert_eq!(sessions.get(user).await, Some(ClassName::new("Orthodontics")));
}

#[tokio::test]
async fn consecutive_uploads_are_logged_separately_under_same_class() {
    let (ctx, sessions, log) = setup();
    let sender = Sender::new(UserId(3), "Carol");
    handle_class_selection(&ctx, sender.user_id, &token(&ctx, "Orthodontics")).await;

    handle_file_upload(&ctx, &sender, document("hw1.pdf")).await;
    handle_file_upload(&ctx, &sender, document("hw2.docx")).await;

    let records = log.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].filename, "hw1.pdf");
    assert_eq!(records[1].filename, "hw2.docx");
    assert!(records
        .iter()
        .all(|record| record.class.as_str() == "Orthodontics" && record.student == "Carol"));
    assert_ne!(records[0].submission_id, records[1].submission_id);
    assert_eq!(
        sessions.get(sender.user_id).await,
        Some(ClassName::new("Orthodontics"))
    );
}

#[tokio::test]
async fn photo_gets_name_derived_from_uploader() {
    let (ctx, _sessions, log) = setup();
    let sender = Sender::new(UserId(11), "Dana Lee");
    handle_class_selection(&ctx, sender.user_id, &token(&ctx, "Prosthodontics")).await;

    let reply = handle_file_upload(&ctx, &sender, Attachment::Photo).await;

    assert!(reply.text.contains("📄 File: photo_from_Dana Lee.jpg"));
    assert_eq!(log.records()[0].filename, "photo_from_Dana Lee.jpg");
}

#[tokio::test]
async fn text_never_changes_the_session() {
    let (ctx, sessions, _log) = setup();
    let user = UserId(21);

    for _ in 0..3 {
        assert_eq!(handle_text(&ctx, user).await.text, replies::GENERIC_WELCOME);
    }
    assert_eq!(sessions.get(user).await, None);

    handle_class_selection(&ctx, user, &token(&ctx, "Basic Sciences")).await;
    for _ in 0..3 {
        assert_eq!(handle_text(&ctx, user).await.text, replies::UPLOAD_NUDGE);
    }
    assert_eq!(
        sessions.get(user).await,
        Some(ClassName::new("Basic Sciences"))
    );
}

#[tokio::test]
async fn unsupported_attachment_is_rejected_without_logging() {
    let (ctx, sessions, log) = setup();
    let sender = Sender::new(UserId(4), "Eve");
    handle_class_selection(&ctx, sender.user_id, &token(&ctx, "Orthodontics")).await;

    let attachment = Attachment::Unsupported {
        kind: "audio".into(),
    };
    let reply = handle_file_upload(&ctx, &sender, attachment).await;

    assert_eq!(reply.text, replies::UNSUPPORTED_ATTACHMENT);
    assert!(log.records().is_empty());
    assert_eq!(
        sessions.get(sender.user_id).await,
        Some(ClassName::new("Orthodontics"))
    );
}

#[tokio::test]
async fn recording_failure_yields_generic_failure_reply() {
    let sessions = Arc::new(InMemorySessionStore::new());
    let ctx = Workflow::new(ClassCatalog::default(), sessions.clone(), Arc::new(FailingLog));
    let sender = Sender::new(UserId(9), "Frank");
    handle_class_selection(&ctx, sender.user_id, &token(&ctx, "Orthodontics")).await;

    let err = submit_file(&ctx, &sender, document("hw.pdf"))
        .await
        .expect_err("should fail");
    assert!(matches!(err, SubmissionError::RecordingFailed(_)));

    let reply = handle_file_upload(&ctx, &sender, document("hw.pdf")).await;
    assert_eq!(reply.text, replies::SUBMISSION_FAILED);
    assert_eq!(
        sessions.get(sender.user_id).await,
        Some(ClassName::new("Orthodontics"))
    );
}

#[tokio::test]
async fn start_lists_every_class_without_touching_sessions() {
    let (ctx, sessions, _log) = setup();
    let first = handle_start(&ctx);
    let second = handle_start(&ctx);

    assert_eq!(first, second);
    assert_eq!(first.choices.len(), 4);
    assert_eq!(first.choices[1].token, "class_orthodontics");
    assert_eq!(sessions.len().await, 0);
}

#[test]
fn get_id_reply_is_markdown_with_chat_id() {
    let reply = handle_get_id(ChatId(-1001234567891));
    assert_eq!(reply.text, "This group ID is: `-1001234567891`");
    assert_eq!(reply.format, shared::protocol::ReplyFormat::Markdown);
}
