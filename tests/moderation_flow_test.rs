//! End-to-end state machine scenarios driven through `Moderator::process`
//! with a recording Bot fake: intake, admin decisions, authorization guards,
//! cooldown refusals, and transport failure handling.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use suggest_bot::moderation::texts;
use suggest_bot::{
    CallbackAction, CallbackEvent, ChatTarget, ContentKind, Event, Moderator, Submission, User,
};

use mock_bot::{BotCall, RecordingBot};

const ADMIN_ID: i64 = 99;
const USER_ID: i64 = 10;

fn channel() -> ChatTarget {
    ChatTarget::Handle("@test_channel".to_string())
}

fn setup() -> (Arc<RecordingBot>, Moderator) {
    let bot = Arc::new(RecordingBot::new());
    let moderator = Moderator::new(bot.clone(), ADMIN_ID, channel());
    (bot, moderator)
}

fn user() -> User {
    User {
        id: USER_ID,
        first_name: "Ann".to_string(),
        username: Some("ann".to_string()),
    }
}

fn admin() -> User {
    User {
        id: ADMIN_ID,
        first_name: "Admin".to_string(),
        username: None,
    }
}

fn callback(who: User, chat_id: i64, message_id: i32, action: CallbackAction) -> Event {
    Event::Callback(CallbackEvent {
        user: who,
        chat_id,
        message_id,
        callback_id: format!("cb-{chat_id}-{message_id}"),
        action,
    })
}

fn text_submission(text: &str) -> Event {
    Event::Content(Submission {
        user: user(),
        chat_id: USER_ID,
        message_id: 1,
        kind: ContentKind::Text,
        text: Some(text.to_string()),
        received_at: chrono::Utc::now(),
    })
}

fn photo_submission() -> Event {
    Event::Content(Submission {
        user: user(),
        chat_id: USER_ID,
        message_id: 2,
        kind: ContentKind::Photo,
        text: None,
        received_at: chrono::Utc::now(),
    })
}

/// Runs the intake flow (write_msg press + content) and returns the review
/// message id the admin decision must reference.
async fn submit(moderator: &mut Moderator, event: Event) -> i32 {
    moderator
        .process(callback(user(), USER_ID, 1, CallbackAction::WriteMessage))
        .await;
    assert!(moderator.is_waiting(USER_ID));
    moderator.process(event).await;
    let ids = moderator.open_review_ids();
    assert_eq!(ids.len(), 1, "exactly one review expected");
    ids[0]
}

#[tokio::test]
async fn start_sends_welcome_with_write_button() {
    let (bot, mut moderator) = setup();

    moderator
        .process(Event::Start {
            user: user(),
            chat_id: USER_ID,
        })
        .await;

    match &bot.calls()[..] {
        [BotCall::SendMessageWithKeyboard { chat, text, keyboard }] => {
            assert_eq!(*chat, ChatTarget::Id(USER_ID));
            assert_eq!(text, texts::WELCOME);
            assert_eq!(keyboard.0[0][0].data, "write_msg");
        }
        calls => panic!("unexpected calls: {calls:?}"),
    }
}

#[tokio::test]
async fn accepted_text_is_published_verbatim() {
    let (bot, mut moderator) = setup();
    let review_id = submit(&mut moderator, text_submission("Hello")).await;

    // User was prompted and then confirmed with a send-more button.
    let user_chat = ChatTarget::Id(USER_ID);
    assert!(bot
        .calls_to(&user_chat)
        .iter()
        .any(|c| matches!(c, BotCall::SendMessage { text, .. } if text == texts::PROMPT)));
    assert!(bot.calls_to(&user_chat).iter().any(|c| matches!(
        c,
        BotCall::SendMessageWithKeyboard { text, keyboard, .. }
            if text == texts::SUBMITTED && keyboard.0[0][0].data == "send_more"
    )));

    // Admin review message carries the submitter info and the decision row.
    let admin_chat = ChatTarget::Id(ADMIN_ID);
    let admin_calls = bot.calls_to(&admin_chat);
    match &admin_calls[..] {
        [BotCall::SendMessageWithKeyboard { text, keyboard, .. }] => {
            assert!(text.contains("Ann"));
            assert!(text.contains(&USER_ID.to_string()));
            assert!(text.contains("Hello"));
            let data: Vec<_> = keyboard.0[0].iter().map(|b| b.data.as_str()).collect();
            assert_eq!(data, ["accept", "reject"]);
        }
        calls => panic!("unexpected admin calls: {calls:?}"),
    }

    moderator
        .process(callback(admin(), ADMIN_ID, review_id, CallbackAction::Accept))
        .await;

    // Channel got the text verbatim, user was notified, controls removed.
    assert_eq!(
        bot.calls_to(&channel()),
        vec![BotCall::SendMessage {
            chat: channel(),
            text: "Hello".to_string(),
        }]
    );
    assert!(bot
        .calls_to(&user_chat)
        .iter()
        .any(|c| matches!(c, BotCall::SendMessage { text, .. } if text == texts::PUBLISHED)));
    assert!(bot.calls_to(&admin_chat).iter().any(|c| matches!(
        c,
        BotCall::RemoveKeyboard { message_id, .. } if *message_id == review_id
    )));
    assert_eq!(
        bot.last_answer(),
        Some((Some(texts::DECISION_PUBLISHED.to_string()), false))
    );
    assert!(moderator.open_review_ids().is_empty());
}

#[tokio::test]
async fn rejected_text_never_reaches_the_channel() {
    let (bot, mut moderator) = setup();
    let review_id = submit(&mut moderator, text_submission("Hello")).await;

    moderator
        .process(callback(admin(), ADMIN_ID, review_id, CallbackAction::Reject))
        .await;

    assert!(bot.calls_to(&channel()).is_empty());
    assert!(bot
        .calls_to(&ChatTarget::Id(USER_ID))
        .iter()
        .any(|c| matches!(c, BotCall::SendMessage { text, .. } if text == texts::REJECTED)));
    assert_eq!(
        bot.last_answer(),
        Some((Some(texts::DECISION_REJECTED.to_string()), false))
    );
    assert!(moderator.open_review_ids().is_empty());
}

#[tokio::test]
async fn second_accept_on_the_same_review_is_not_found() {
    let (bot, mut moderator) = setup();
    let review_id = submit(&mut moderator, text_submission("Hello")).await;

    moderator
        .process(callback(admin(), ADMIN_ID, review_id, CallbackAction::Accept))
        .await;
    moderator
        .process(callback(admin(), ADMIN_ID, review_id, CallbackAction::Accept))
        .await;

    // No duplicate channel post.
    let channel_posts = bot
        .calls_to(&channel())
        .iter()
        .filter(|c| matches!(c, BotCall::SendMessage { .. }))
        .count();
    assert_eq!(channel_posts, 1);
    assert_eq!(
        bot.last_answer(),
        Some((Some(texts::REVIEW_NOT_FOUND.to_string()), false))
    );
}

#[tokio::test]
async fn media_submissions_are_copied_preserving_kind() {
    let (bot, mut moderator) = setup();
    let review_id = submit(&mut moderator, photo_submission()).await;

    // Admin got the info header, then a copy with the decision keyboard.
    let admin_chat = ChatTarget::Id(ADMIN_ID);
    let admin_calls = bot.calls_to(&admin_chat);
    assert!(matches!(
        &admin_calls[..],
        [
            BotCall::SendMessage { .. },
            BotCall::CopyMessage {
                from_chat: USER_ID,
                message_id: 2,
                with_keyboard: true,
                ..
            }
        ]
    ));

    moderator
        .process(callback(admin(), ADMIN_ID, review_id, CallbackAction::Accept))
        .await;

    // The channel gets a copy of the original, no keyboard.
    assert_eq!(
        bot.calls_to(&channel()),
        vec![BotCall::CopyMessage {
            to: channel(),
            from_chat: USER_ID,
            message_id: 2,
            with_keyboard: false,
        }]
    );
}

#[tokio::test]
async fn content_from_a_user_not_waiting_is_ignored() {
    let (bot, mut moderator) = setup();

    moderator.process(text_submission("unsolicited")).await;

    assert!(bot.calls().is_empty());
    assert!(moderator.open_review_ids().is_empty());
}

#[tokio::test]
async fn decision_from_a_non_admin_is_ignored() {
    let (bot, mut moderator) = setup();
    let review_id = submit(&mut moderator, text_submission("Hello")).await;
    let calls_before = bot.calls().len();

    moderator
        .process(callback(user(), USER_ID, review_id, CallbackAction::Accept))
        .await;

    assert_eq!(bot.calls().len(), calls_before);
    assert_eq!(moderator.open_review_ids(), vec![review_id]);
}

#[tokio::test]
async fn broadcast_from_a_non_admin_is_denied() {
    let (bot, mut moderator) = setup();

    moderator
        .process(Event::Broadcast {
            user: user(),
            chat_id: USER_ID,
            text: Some("test".to_string()),
        })
        .await;

    assert!(bot.calls_to(&channel()).is_empty());
    assert_eq!(
        bot.calls_to(&ChatTarget::Id(USER_ID)),
        vec![BotCall::SendMessage {
            chat: ChatTarget::Id(USER_ID),
            text: texts::NO_ACCESS.to_string(),
        }]
    );
}

#[tokio::test]
async fn broadcast_without_text_gets_a_usage_notice() {
    let (bot, mut moderator) = setup();

    moderator
        .process(Event::Broadcast {
            user: admin(),
            chat_id: ADMIN_ID,
            text: None,
        })
        .await;

    assert!(bot.calls_to(&channel()).is_empty());
    assert_eq!(
        bot.calls_to(&ChatTarget::Id(ADMIN_ID)),
        vec![BotCall::SendMessage {
            chat: ChatTarget::Id(ADMIN_ID),
            text: texts::BROADCAST_USAGE.to_string(),
        }]
    );
}

#[tokio::test]
async fn broadcast_with_text_posts_html_to_the_channel() {
    let (bot, mut moderator) = setup();

    moderator
        .process(Event::Broadcast {
            user: admin(),
            chat_id: ADMIN_ID,
            text: Some("important news".to_string()),
        })
        .await;

    match &bot.calls_to(&channel())[..] {
        [BotCall::SendHtml { text, .. }] => {
            assert!(text.starts_with(texts::BROADCAST_HEADER));
            assert!(text.ends_with("important news"));
        }
        calls => panic!("unexpected channel calls: {calls:?}"),
    }
    assert!(bot
        .calls_to(&ChatTarget::Id(ADMIN_ID))
        .iter()
        .any(|c| matches!(c, BotCall::SendMessage { text, .. } if text == texts::BROADCAST_SENT)));
}

#[tokio::test]
async fn write_request_right_after_a_submission_hits_the_cooldown() {
    let (bot, mut moderator) = setup();
    submit(&mut moderator, text_submission("Hello")).await;

    moderator
        .process(callback(user(), USER_ID, 3, CallbackAction::SendMore))
        .await;

    let (text, show_alert) = bot.last_answer().expect("callback answered");
    assert!(show_alert);
    let text = text.expect("alert carries the remaining wait");
    assert!(text.starts_with("⏳ Подожди"), "got: {text}");
    assert!(!moderator.is_waiting(USER_ID));
}

#[tokio::test]
async fn failed_forward_notifies_nobody_else_and_keeps_registry_clean() {
    let (bot, mut moderator) = setup();
    moderator
        .process(callback(user(), USER_ID, 1, CallbackAction::WriteMessage))
        .await;

    bot.fail_sends.store(true, Ordering::SeqCst);
    moderator.process(text_submission("Hello")).await;
    bot.fail_sends.store(false, Ordering::SeqCst);

    // No review registered, waiting cleared, cooldown consumed.
    assert!(moderator.open_review_ids().is_empty());
    assert!(!moderator.is_waiting(USER_ID));
    moderator
        .process(callback(user(), USER_ID, 4, CallbackAction::WriteMessage))
        .await;
    let (_, show_alert) = bot.last_answer().expect("callback answered");
    assert!(show_alert, "retry must be refused by the cooldown");
}

#[tokio::test]
async fn failed_decision_keeps_the_review_item() {
    let (bot, mut moderator) = setup();
    let review_id = submit(&mut moderator, text_submission("Hello")).await;

    bot.fail_sends.store(true, Ordering::SeqCst);
    moderator
        .process(callback(admin(), ADMIN_ID, review_id, CallbackAction::Accept))
        .await;

    assert_eq!(moderator.open_review_ids(), vec![review_id]);
    assert_eq!(
        bot.last_answer(),
        Some((Some(texts::DECISION_FAILED.to_string()), false))
    );

    // The decision can be retried once the transport recovers.
    bot.fail_sends.store(false, Ordering::SeqCst);
    moderator
        .process(callback(admin(), ADMIN_ID, review_id, CallbackAction::Accept))
        .await;
    assert!(moderator.open_review_ids().is_empty());
    assert_eq!(
        bot.calls_to(&channel()),
        vec![BotCall::SendMessage {
            chat: channel(),
            text: "Hello".to_string(),
        }]
    );
}
