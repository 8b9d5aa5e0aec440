//! Texts sent back to students.

use shared::domain::{ChatId, ClassName};

pub const WELCOME_WITH_CHOICES: &str =
    "🎓 Welcome to Assignment Submission Bot!\n\nPlease select your class:";

pub const SELECT_CLASS_FIRST: &str = "❌ Please use /start first to select your class.";

pub const UNSUPPORTED_ATTACHMENT: &str = "❌ Please send a valid file (PDF, Word, Image, etc.)";

pub const SUBMISSION_FAILED: &str =
    "❌ Error submitting assignment. Please try again or contact your teacher.";

pub const UPLOAD_NUDGE: &str = "📎 Please upload your assignment file (PDF, Word, Image, etc.)";

pub const GENERIC_WELCOME: &str = "👋 Welcome! Use /start to begin assignment submission.";

pub const UNKNOWN_CLASS: &str =
    "❌ That class is no longer available. Please use /start to pick again.";

pub const HELP: &str = "📚 Assignment Bot Help:\n\n\
/start - Begin submission\n\
/help - This message\n\n\
How to submit:\n\
1. Click /start\n\
2. Select your class\n\
3. Upload your file\n\n\
Your submissions are private! ✅";

pub fn class_selected(class: &ClassName) -> String {
    format!(
        "✅ You selected: {class}\n\n\
📎 Now please upload your assignment file:\n\
• PDF documents\n\
• Word files (.doc, .docx)\n\
• Images (JPG, PNG)\n\
• Or any other document"
    )
}

pub fn submission_received(class: &ClassName, filename: &str, student: &str) -> String {
    format!(
        "✅ Assignment submitted successfully!\n\n\
📚 Class: {class}\n\
📄 File: {filename}\n\
👤 Student: {student}\n\n\
Thank you! Your teacher will review it."
    )
}

pub fn chat_id(chat_id: ChatId) -> String {
    format!("This group ID is: `{chat_id}`")
}

pub fn photo_filename(display_name: &str) -> String {
    format!("photo_from_{display_name}.jpg")
}
