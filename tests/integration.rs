//! Integration tests running the whole pipeline over realistic exports.

use chatsift::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::Once;

static INIT: Once = Once::new();

fn fixtures_dir() -> &'static str {
    "tests/fixtures"
}

fn ensure_fixtures() {
    INIT.call_once(|| {
        let dir = fixtures_dir();
        if !Path::new(dir).exists() {
            fs::create_dir_all(dir).unwrap();
        }

        // WhatsApp: Android, US locale
        let whatsapp_android = "\
1/15/24, 10:00 AM - Messages and calls are end-to-end encrypted. No one outside of this chat, not even WhatsApp, can read or listen to them. Tap to learn more.
1/15/24, 10:01 AM - Alice created group \"Weekend\"
1/15/24, 10:02 AM - Alice: Hello everyone
1/15/24, 10:03 AM - Bob: Hi Alice!
How was the trip?
1/15/24, 10:05 AM - Alice: <Media omitted>
1/15/24, 10:06 AM - Alice: It was great
1/16/24, 9:00 PM - Bob: This message was deleted
";
        fs::write(format!("{dir}/whatsapp_android.txt"), whatsapp_android).unwrap();

        // WhatsApp: iOS, CRLF line breaks, BOM and direction marks
        let whatsapp_ios = "\u{feff}[15.01.24, 10:30:45] Alice: Привет\r\n\
[15.01.24, 10:31:02] Bob: \u{200e}image omitted\r\n\
[15.01.24, 10:32:10] Bob: 你好世界\r\n";
        fs::write(format!("{dir}/whatsapp_ios.txt"), whatsapp_ios).unwrap();

        // WhatsApp: iOS group, notices carry the group name as sender
        let whatsapp_ios_group = "\
[15.01.24, 10:30:00] Trip: \u{200e}Messages and calls are end-to-end encrypted. No one outside of this chat, not even WhatsApp, can read or listen to them.
[15.01.24, 10:30:05] Trip: \u{200e}Alice created group \"Trip\"
[15.01.24, 10:30:10] Trip: \u{200e}Alice added Bob
[15.01.24, 10:31:00] Trip: \u{200e}Bob left
[15.01.24, 10:32:00] Trip: \u{200e}Alice removed Carol
[15.01.24, 10:33:00] Trip: \u{200e}Dave joined using this group's invite link
[15.01.24, 10:34:00] Alice: hi
";
        fs::write(format!("{dir}/whatsapp_ios_group.txt"), whatsapp_ios_group).unwrap();

        // Telegram: JSON export with formatting, service entries and media
        let telegram_json = r#"{
  "name": "Test Chat",
  "type": "personal_chat",
  "id": 123456789,
  "messages": [
    {"id": 1, "type": "service", "date": "2024-01-15T10:00:00", "date_unixtime": "1705312800", "actor": "Alice", "action": "create_group"},
    {"id": 2, "type": "message", "date": "2024-01-15T10:30:00", "date_unixtime": "1705314600", "from": "Alice", "text": "Hello!"},
    {"id": 3, "type": "message", "date": "2024-01-15T10:31:00", "date_unixtime": "1705314660", "from": "Bob", "text": [
      "Check this: ",
      {"type": "link", "text": "https://example.com"}
    ]},
    {"id": 4, "type": "message", "date": "2024-01-15T10:32:00", "date_unixtime": "1705314720", "from": "Bob", "text": "", "media_type": "sticker"},
    {"id": 5, "type": "message", "date": "2024-01-15T10:33:00", "date_unixtime": "1705314780", "text": "no sender"},
    {"id": 6, "type": "message", "date": "2024-01-15T10:34:00", "date_unixtime": "1705314840", "from": "Alice", "text": "Nice"}
  ]
}"#;
        fs::write(format!("{dir}/telegram.json"), telegram_json).unwrap();

        // Instagram: newest first, mojibake-encoded Cyrillic
        let instagram_json = r#"{
  "participants": [{"name": "alice_ig"}, {"name": "bob_ig"}],
  "messages": [
    {"sender_name": "bob_ig", "timestamp_ms": 1705314720000, "content": "Ð\u009fÑ\u0080Ð¸Ð²ÐµÑ\u0082"},
    {"sender_name": "alice_ig", "timestamp_ms": 1705314660000, "content": "alice_ig liked a message"},
    {"sender_name": "alice_ig", "timestamp_ms": 1705314630000, "photos": [{"uri": "photos/1.jpg"}]},
    {"sender_name": "alice_ig", "timestamp_ms": 1705314600000, "content": "Hello"}
  ]
}"#;
        fs::write(format!("{dir}/instagram.json"), instagram_json).unwrap();
    });
}

fn fixture(name: &str) -> String {
    format!("{}/{}", fixtures_dir(), name)
}

fn pipeline() -> Pipeline {
    Pipeline::default()
}

// =========================================================================
// Properties from the pipeline contract
// =========================================================================

#[test]
fn test_two_message_export() {
    let result = process(
        "1/1/24, 10:00 AM - Alice: Hi\n1/1/24, 10:01 AM - Bob: Hello",
        Platform::WhatsApp,
        &ProcessOptions::default(),
    );

    assert_eq!(result.messages.len(), 2);
    assert_eq!(result.messages[0].sender, "Alice");
    assert_eq!(result.messages[1].sender, "Bob");
    assert!(result.warnings.is_empty());
}

#[test]
fn test_continuation_line_joins_previous_message() {
    let result = process(
        "1/1/24, 10:00 AM - Alice: Hi\nhow are you?",
        Platform::WhatsApp,
        &ProcessOptions::default(),
    );

    assert_eq!(result.messages.len(), 1);
    assert_eq!(result.messages[0].message, "Hi\nhow are you?");
}

#[test]
fn test_all_system_lines() {
    let raw = "\
1/15/24, 10:00 AM - Messages and calls are end-to-end encrypted. No one outside of this chat can read them.
1/15/24, 10:01 AM - Alice created group \"Trip\"
1/15/24, 10:02 AM - Alice added Bob
1/15/24, 10:03 AM - Bob left";
    let result = process(raw, Platform::WhatsApp, &ProcessOptions::default());

    assert!(result.messages.is_empty());
    assert_eq!(result.stats.filtered.media, 0);
    assert_eq!(result.stats.filtered.system, 4);
    assert_eq!(result.stats.total_messages, 0);

    let retained: Vec<_> = result.warnings_of(WarningKind::NoMessagesRetained).collect();
    assert_eq!(retained.len(), 1);
}

#[test]
fn test_idempotent_over_fixtures() {
    ensure_fixtures();
    let pipeline = pipeline();

    for (name, platform) in [
        ("whatsapp_android.txt", Platform::WhatsApp),
        ("whatsapp_ios.txt", Platform::WhatsApp),
        ("whatsapp_ios_group.txt", Platform::WhatsApp),
        ("telegram.json", Platform::Telegram),
        ("instagram.json", Platform::Instagram),
    ] {
        let first = pipeline.process_file(fixture(name), platform).unwrap();
        let second = pipeline.process_file(fixture(name), platform).unwrap();
        assert_eq!(first, second, "{name}");

        let a = serde_json::to_string(&first).unwrap();
        let b = serde_json::to_string(&second).unwrap();
        assert_eq!(a, b, "{name}");
    }
}

#[test]
fn test_totals_equal_sender_sums() {
    ensure_fixtures();
    let result = pipeline()
        .process_file(fixture("whatsapp_android.txt"), Platform::WhatsApp)
        .unwrap();
    let stats = &result.stats;

    let messages: usize = stats.per_sender.values().map(|s| s.messages).sum();
    let characters: usize = stats.per_sender.values().map(|s| s.characters).sum();
    let words: usize = stats.per_sender.values().map(|s| s.words).sum();
    assert_eq!(messages, stats.total_messages);
    assert_eq!(characters, stats.total_characters);
    assert_eq!(words, stats.total_words);
    assert_eq!(stats.hourly_activity.iter().sum::<usize>(), stats.total_messages);
    assert_eq!(stats.weekday_activity.iter().sum::<usize>(), stats.total_messages);
}

// =========================================================================
// WhatsApp
// =========================================================================

#[test]
fn test_whatsapp_android_export() {
    ensure_fixtures();
    let result = pipeline()
        .process_file(fixture("whatsapp_android.txt"), Platform::WhatsApp)
        .unwrap();

    let bodies: Vec<&str> = result.messages.iter().map(|m| m.message.as_str()).collect();
    assert_eq!(
        bodies,
        ["Hello everyone", "Hi Alice!\nHow was the trip?", "It was great"]
    );
    assert_eq!(result.stats.filtered, FilterStats { system: 3, media: 1 });
    assert!(result.warnings.is_empty());

    let alice = result.stats.sender("Alice").unwrap();
    let bob = result.stats.sender("Bob").unwrap();
    assert_eq!(alice.messages, 2);
    assert_eq!(alice.characters, 26);
    assert_eq!(bob.messages, 1);
    assert_eq!(bob.characters, 26);
    assert_eq!(result.stats.total_characters, 52);

    assert_eq!(bob.replies, 1);
    assert_eq!(bob.average_reply_seconds, Some(60));
    assert_eq!(alice.replies, 1);
    assert_eq!(alice.average_reply_seconds, Some(180));

    assert_eq!(result.stats.hourly_activity[10], 3);
    assert_eq!(result.stats.active_days, 1);
}

#[test]
fn test_whatsapp_ios_export() {
    ensure_fixtures();
    let result = pipeline()
        .process_file(fixture("whatsapp_ios.txt"), Platform::WhatsApp)
        .unwrap();

    assert_eq!(result.messages.len(), 2);
    assert_eq!(result.messages[0].message, "Привет");
    assert_eq!(result.messages[1].message, "你好世界");
    assert_eq!(result.messages[0].timestamp, "15.01.24, 10:30:45");
    assert_eq!(result.stats.filtered.media, 1);

    let bob = result.stats.sender("Bob").unwrap();
    assert_eq!(bob.characters, 4);
    assert_eq!(bob.words, 4);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_whatsapp_ios_group_notices_are_system() {
    ensure_fixtures();
    let result = pipeline()
        .process_file(fixture("whatsapp_ios_group.txt"), Platform::WhatsApp)
        .unwrap();

    assert_eq!(result.messages.len(), 1);
    assert_eq!(result.messages[0].sender, "Alice");
    assert_eq!(result.messages[0].message, "hi");
    assert_eq!(result.stats.filtered, FilterStats { system: 6, media: 0 });
    assert!(result.stats.sender("Trip").is_none());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_whatsapp_chinese_group_notices() {
    let raw = "\
2024/1/15 下午3:40 - 张三添加了李四
2024/1/15 下午3:41 - 李四已退出
2024/1/15 下午3:42 - 张三: 人呢";
    let result = process(raw, Platform::WhatsApp, &ProcessOptions::default());

    assert_eq!(result.messages.len(), 1);
    assert_eq!(result.stats.filtered.system, 2);
}

#[test]
fn test_whatsapp_ambiguous_dates_warn_once() {
    let raw = "01/02/2024, 10:00 - Alice: Hi\n03/04/2024, 11:00 - Bob: Hey";
    let result = process(raw, Platform::WhatsApp, &ProcessOptions::default());

    assert_eq!(result.messages.len(), 2);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].kind, WarningKind::AmbiguousDateOrder);
    assert_eq!(result.messages[0].date.format("%Y-%m-%d").to_string(), "2024-02-01");
}

#[test]
fn test_whatsapp_out_of_order_kept_in_place() {
    let raw = "15/01/2024, 10:00 - Alice: later\n14/01/2024, 09:00 - Bob: earlier";
    let result = process(raw, Platform::WhatsApp, &ProcessOptions::default());

    assert_eq!(result.messages[0].message, "later");
    assert_eq!(result.messages[1].message, "earlier");
    let warning = result.warnings_of(WarningKind::OutOfOrderTimestamp).next().unwrap();
    assert_eq!(warning.line, Some(1));
}

#[test]
fn test_whatsapp_chinese_export() {
    let raw = "\
2024/1/15 下午3:45 - 张三: 你好
2024/1/15 下午3:46 - 李四: [图片]
2024/1/15 下午3:47 - 李四: 我们明天见";
    let result = process(raw, Platform::WhatsApp, &ProcessOptions::default());

    let senders: Vec<&str> = result.messages.iter().map(|m| m.sender.as_str()).collect();
    assert_eq!(senders, ["张三", "李四"]);
    assert_eq!(result.stats.filtered.media, 1);
    assert_eq!(result.stats.hourly_activity[15], 2);
    assert_eq!(result.stats.sender("李四").unwrap().characters, 5);
}

// =========================================================================
// Telegram
// =========================================================================

#[test]
fn test_telegram_json_export() {
    ensure_fixtures();
    let result = pipeline()
        .process_file(fixture("telegram.json"), Platform::Telegram)
        .unwrap();

    let bodies: Vec<&str> = result.messages.iter().map(|m| m.message.as_str()).collect();
    assert_eq!(bodies, ["Hello!", "Check this: https://example.com", "Nice"]);
    assert_eq!(result.stats.filtered, FilterStats { system: 1, media: 1 });
    assert_eq!(result.messages[0].timestamp, "1705314600");

    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].kind, WarningKind::SkippedEntry);
    assert_eq!(result.warnings[0].line, Some(4));
}

#[test]
fn test_telegram_text_copy() {
    let raw = "\
Alice, [15.01.2024 10:30]
Hello!
How are you?

Bob, [15.01.2024 10:31]
Fine";
    let result = process(raw, Platform::Telegram, &ProcessOptions::default());

    assert_eq!(result.messages.len(), 2);
    assert_eq!(result.messages[0].message, "Hello!\nHow are you?");
    assert_eq!(result.messages[1].sender, "Bob");
    assert_eq!(result.messages[1].message, "Fine");
    assert!(result.warnings.is_empty());
}

// =========================================================================
// Instagram
// =========================================================================

#[test]
fn test_instagram_json_export() {
    ensure_fixtures();
    let result = pipeline()
        .process_file(fixture("instagram.json"), Platform::Instagram)
        .unwrap();

    let bodies: Vec<&str> = result.messages.iter().map(|m| m.message.as_str()).collect();
    assert_eq!(bodies, ["Hello", "Привет"]);
    assert_eq!(result.stats.filtered, FilterStats { system: 1, media: 1 });
    assert!(result.warnings.is_empty());

    let bob = result.stats.sender("bob_ig").unwrap();
    assert_eq!(bob.replies, 1);
    assert_eq!(bob.average_reply_seconds, Some(120));
}

#[test]
fn test_instagram_json_without_encoding_fix() {
    ensure_fixtures();
    let pipeline = Pipeline::new(ProcessOptions::new().with_fix_encoding(false));
    let result = pipeline
        .process_file(fixture("instagram.json"), Platform::Instagram)
        .unwrap();

    assert_ne!(result.messages[1].message, "Привет");
    // the C1 controls of the Latin-1 view are stripped
    assert_eq!(result.messages[1].message.chars().count(), 9);
    assert!(!result.messages[1].message.chars().any(char::is_control));
}

#[test]
fn test_instagram_text_copy() {
    let raw = "\
alice (Jan 15, 2024, 10:30 AM): Hello
bob (Jan 15, 2024, 10:31 AM): Hey!
see you soon";
    let result = process(raw, Platform::Instagram, &ProcessOptions::default());

    assert_eq!(result.messages.len(), 2);
    assert_eq!(result.messages[1].message, "Hey!\nsee you soon");
    assert!(result.warnings.is_empty());
}

// =========================================================================
// Options and custom filters
// =========================================================================

#[test]
fn test_custom_filter_and_stop_words() {
    let filter = NoiseFilter::new().with_system_pattern(r"^!\w+$").unwrap();
    let options = ProcessOptions::new()
        .with_top_words(2)
        .with_stop_words(stop_words(["the"]));
    let pipeline = Pipeline::new(options).with_filter(filter);

    let raw = "\
[2024-01-15 10:00] bot: !help
[2024-01-15 10:01] alice: the cat and the dog
[2024-01-15 10:02] bob: the cat";
    let result = pipeline.process(raw, Platform::Telegram);

    assert_eq!(result.stats.filtered.system, 1);
    assert_eq!(result.stats.total_words, 7);
    let words: Vec<(&str, usize)> = result
        .stats
        .top_words
        .iter()
        .map(|w| (w.word.as_str(), w.count))
        .collect();
    assert_eq!(words, [("cat", 2), ("and", 1)]);
}

#[test]
fn test_process_named_rejects_unknown_platform() {
    let err = pipeline().process_named("hello", "discord").unwrap_err();
    assert!(err.is_unsupported_platform());
    assert!(err.to_string().contains("discord"));
}
