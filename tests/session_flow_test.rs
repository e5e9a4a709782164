//! End-to-end customization flows driven through the dispatcher
//!
//! Run with: cargo test --test session_flow_test

mod common;

use common::*;
use filetailor::session::PendingPrompt;
use filetailor::telegram::texts;
use filetailor::telegram::CallbackAction;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_upload_rename_download() {
    let bot = TestBot::new();

    let record = bot.upload(USER, "doc-1", "script.py", b"print('hi')").await;
    assert_eq!(record.original_name.as_deref(), Some("script.py"));
    assert_eq!(record.file_name, None);

    let menu = bot.transport.last_message(USER as i64).unwrap();
    assert_eq!(menu.text, texts::UPLOAD_ACCEPTED);
    assert_eq!(menu.callback_tokens(), vec!["thumbnail", "caption", "rename", "download"]);

    bot.send(callback(USER, CallbackAction::Rename)).await;
    let edits = bot.transport.edits();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].1, MENU_MESSAGE);
    assert!(edits[0].2.contains("What do you want to name the file?"));

    bot.send(text(USER, "tool")).await;
    let record = bot.session(USER).unwrap();
    assert_eq!(record.file_name.as_deref(), Some("tool.py"));
    assert_eq!(record.pending_prompt, PendingPrompt::Idle);

    let confirmation = bot.transport.last_message(USER as i64).unwrap();
    assert!(confirmation.text.contains("tool.py"));
    assert_eq!(confirmation.callback_tokens(), vec!["thumbnail", "caption", "download"]);

    bot.send(callback(USER, CallbackAction::Download)).await;
    let documents = bot.transport.documents();
    assert_eq!(documents.len(), 1);
    let (chat, delivery) = &documents[0];
    assert_eq!(chat.0, USER as i64);
    assert_eq!(delivery.file_name, "tool.py");
    assert_eq!(delivery.bytes, b"print('hi')".to_vec());
    assert_eq!(delivery.caption, None);
    assert_eq!(delivery.thumbnail, None);

    let answers = bot.transport.callback_answers();
    assert_eq!(answers.last().unwrap(), &(Some(texts::FILE_SENT.to_string()), false));

    // Downloading does not end the session
    assert!(bot.session(USER).is_some());
}

#[tokio::test]
async fn test_caption_without_session_alerts() {
    let bot = TestBot::new();

    bot.send(callback(USER, CallbackAction::Caption)).await;

    assert_eq!(
        bot.transport.callback_answers(),
        vec![(Some(texts::SEND_FILE_FIRST.to_string()), true)]
    );
    assert!(bot.session(USER).is_none());
    assert!(bot.transport.edits().is_empty());
}

#[tokio::test]
async fn test_download_without_session_alerts() {
    let bot = TestBot::new();

    bot.send(callback(USER, CallbackAction::Download)).await;

    assert_eq!(
        bot.transport.callback_answers(),
        vec![(Some(texts::NO_FILE_FOUND.to_string()), true)]
    );
    assert!(bot.transport.documents().is_empty());
}

#[tokio::test]
async fn test_second_upload_resets_customizations() {
    let bot = TestBot::new();
    let first = bot.upload(USER, "doc-1", "a.py", b"a").await;

    bot.send(callback(USER, CallbackAction::Caption)).await;
    bot.send(text(USER, "My caption")).await;
    bot.send(callback(USER, CallbackAction::Thumbnail)).await;
    bot.transport.add_file("photo-1", b"jpeg");
    bot.send(photo(USER, "photo-1")).await;
    bot.send(callback(USER, CallbackAction::Rename)).await;
    bot.send(text(USER, "renamed")).await;

    let customized = bot.session(USER).unwrap();
    let old_thumb = customized.thumbnail_path.clone().unwrap();
    assert_eq!(customized.caption.as_deref(), Some("My caption"));
    assert_eq!(customized.file_name.as_deref(), Some("renamed.py"));

    let second = bot.upload(USER, "doc-2", "b.py", b"b").await;
    assert_eq!(second.original_name.as_deref(), Some("b.py"));
    assert_eq!(second.thumbnail_path, None);
    assert_eq!(second.caption, None);
    assert_eq!(second.file_name, None);
    assert_eq!(second.pending_prompt, PendingPrompt::Idle);

    assert!(!first.file_path.exists());
    assert!(!old_thumb.exists());
    assert!(second.file_path.exists());
}

#[tokio::test]
async fn test_each_customization_leaves_the_others_alone() {
    let bot = TestBot::new();
    bot.upload(USER, "doc-1", "script.py", b"x").await;

    bot.send(callback(USER, CallbackAction::Rename)).await;
    bot.send(text(USER, "tool")).await;

    bot.send(callback(USER, CallbackAction::Caption)).await;
    bot.send(text(USER, "Look at this")).await;

    let record = bot.session(USER).unwrap();
    assert_eq!(record.file_name.as_deref(), Some("tool.py"));
    assert_eq!(record.caption.as_deref(), Some("Look at this"));
    assert_eq!(record.original_name.as_deref(), Some("script.py"));
    assert_eq!(record.thumbnail_path, None);

    let menu = bot.transport.last_message(USER as i64).unwrap();
    assert_eq!(menu.callback_tokens(), vec!["thumbnail", "download"]);

    bot.send(callback(USER, CallbackAction::Download)).await;
    let (_, delivery) = bot.transport.documents().pop().unwrap();
    assert_eq!(delivery.file_name, "tool.py");
    assert_eq!(delivery.caption.as_deref(), Some("Look at this"));
}

#[tokio::test]
async fn test_thumbnail_flow() {
    let bot = TestBot::new();
    bot.upload(USER, "doc-1", "script.py", b"x").await;
    bot.transport.add_file("photo-1", b"jpeg-bytes");

    // No prompt yet: the photo is ignored without downloading it
    bot.send(photo(USER, "photo-1")).await;
    assert!(!bot.transport.fetches().contains(&"photo-1".to_string()));
    assert_eq!(bot.session(USER).unwrap().thumbnail_path, None);

    bot.send(callback(USER, CallbackAction::Thumbnail)).await;
    assert_eq!(bot.session(USER).unwrap().pending_prompt, PendingPrompt::Thumbnail);
    bot.send(photo(USER, "photo-1")).await;

    let record = bot.session(USER).unwrap();
    assert!(record.thumbnail_path.as_ref().unwrap().exists());
    assert_eq!(record.pending_prompt, PendingPrompt::Idle);

    let confirmation = bot.transport.last_message(USER as i64).unwrap();
    assert_eq!(confirmation.text, texts::THUMBNAIL_SET);
    assert_eq!(confirmation.callback_tokens(), vec!["caption", "rename", "download"]);

    bot.send(callback(USER, CallbackAction::Download)).await;
    let (_, delivery) = bot.transport.documents().pop().unwrap();
    assert_eq!(delivery.thumbnail, Some(b"jpeg-bytes".to_vec()));
    assert_eq!(delivery.file_name, "script.py");
}

#[tokio::test]
async fn test_text_without_prompt_is_ignored() {
    let bot = TestBot::new();
    bot.upload(USER, "doc-1", "script.py", b"x").await;
    let before = bot.transport.sent_messages(USER as i64).len();

    bot.send(text(USER, "hello there")).await;

    assert_eq!(bot.transport.sent_messages(USER as i64).len(), before);
    let record = bot.session(USER).unwrap();
    assert_eq!(record.caption, None);
    assert_eq!(record.file_name, None);
}

#[tokio::test]
async fn test_slash_text_is_not_captured() {
    let bot = TestBot::new();
    bot.upload(USER, "doc-1", "script.py", b"x").await;
    bot.send(callback(USER, CallbackAction::Caption)).await;

    bot.send(text(USER, "/whatever")).await;
    let record = bot.session(USER).unwrap();
    assert_eq!(record.caption, None);
    assert_eq!(record.pending_prompt, PendingPrompt::Caption);

    bot.send(text(USER, "real caption")).await;
    assert_eq!(bot.session(USER).unwrap().caption.as_deref(), Some("real caption"));
}

#[tokio::test]
async fn test_last_prompt_wins() {
    let bot = TestBot::new();
    bot.upload(USER, "doc-1", "script.py", b"x").await;

    bot.send(callback(USER, CallbackAction::Caption)).await;
    bot.send(callback(USER, CallbackAction::Rename)).await;
    bot.send(text(USER, "final")).await;

    let record = bot.session(USER).unwrap();
    assert_eq!(record.file_name.as_deref(), Some("final.py"));
    assert_eq!(record.caption, None);
}

#[tokio::test]
async fn test_prompts_are_scoped_to_their_user() {
    let bot = TestBot::new();
    bot.upload(USER, "doc-a", "a.py", b"a").await;
    bot.upload(OTHER_USER, "doc-b", "b.py", b"b").await;

    bot.send(callback(USER, CallbackAction::Caption)).await;
    bot.send(text(OTHER_USER, "not for you")).await;

    assert_eq!(bot.session(OTHER_USER).unwrap().caption, None);
    assert_eq!(bot.session(USER).unwrap().caption, None);
    assert_eq!(bot.session(USER).unwrap().pending_prompt, PendingPrompt::Caption);

    bot.send(text(USER, "mine")).await;
    assert_eq!(bot.session(USER).unwrap().caption.as_deref(), Some("mine"));
    assert_eq!(bot.session(OTHER_USER).unwrap().caption, None);
}

#[tokio::test]
async fn test_wrong_extension_is_rejected() {
    let bot = TestBot::new();
    bot.transport.add_file("doc-1", b"notes");

    bot.send(document(USER, "doc-1", Some("notes.txt"))).await;

    let reply = bot.transport.last_message(USER as i64).unwrap();
    assert!(reply.text.contains(".py"));
    assert!(bot.session(USER).is_none());
    assert!(bot.transport.fetches().is_empty());
}

#[tokio::test]
async fn test_rejected_upload_keeps_existing_session() {
    let bot = TestBot::new();
    let record = bot.upload(USER, "doc-1", "script.py", b"x").await;

    bot.transport.add_file("doc-2", b"y");
    bot.send(document(USER, "doc-2", Some("image.png"))).await;

    assert_eq!(bot.session(USER), Some(record));
}

#[tokio::test]
async fn test_failed_download_from_telegram() {
    let bot = TestBot::new();

    bot.send(document(USER, "missing", Some("script.py"))).await;

    assert_eq!(bot.transport.last_message(USER as i64).unwrap().text, texts::DOWNLOAD_FAILED);
    assert!(bot.session(USER).is_none());
}

#[tokio::test]
async fn test_delivery_error_is_reported_in_alert() {
    let bot = TestBot::new();
    bot.upload(USER, "doc-1", "script.py", b"x").await;
    std::fs::remove_file(bot.staged_file(USER)).unwrap();

    bot.send(callback(USER, CallbackAction::Download)).await;

    let (text, alert) = bot.transport.callback_answers().pop().unwrap();
    assert!(alert);
    assert!(text.unwrap().starts_with("❌ Error sending file:"));
    assert!(bot.transport.documents().is_empty());
}
