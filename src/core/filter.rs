//! Noise filter: removes system notices and media placeholders.
//!
//! A message is tested against the media patterns first, then the system
//! patterns, always on its trimmed body and case-insensitively. The first
//! category that matches decides where the message is counted. The sender is
//! never consulted: a [`NOTICE_SENDER`](crate::message::NOTICE_SENDER) line
//! that matches no pattern is kept like any other message.
//!
//! The built-in lists cover English, Chinese (simplified and traditional) and
//! Russian exports of WhatsApp, Telegram and Instagram.
//!
//! # Example
//!
//! ```
//! use chatsift::RawMessage;
//! use chatsift::core::filter::NoiseFilter;
//! use chrono::{TimeZone, Utc};
//!
//! let date = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
//! let messages = vec![
//!     RawMessage::new("Alice", "<Media omitted>", date, ""),
//!     RawMessage::new("Bob", "This message was deleted", date, ""),
//!     RawMessage::new("Alice", "see you", date, ""),
//! ];
//!
//! let (kept, stats) = NoiseFilter::new().filter(messages);
//! assert_eq!(kept.len(), 1);
//! assert_eq!((stats.media, stats.system), (1, 1));
//! ```

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::RawMessage;
use crate::core::models::FilterStats;
use crate::error::{ChatsiftError, Result};

/// Built-in media placeholder patterns.
pub const MEDIA_PATTERNS: &[&str] = &[
    r"^<media omitted>$",
    r"^(?:image|video|audio|sticker|gif|document|contact card) omitted$",
    r"^<attached: [^>]+>$",
    r"^.+ \(file attached\)$",
    r"^(?:.{1,80} )?sent an? (?:attachment|photo|video|voice message|sticker|gif)\.?$",
    r"^\[(?:photo|video|sticker|voice message|video message|file|animation|audio|gif)\]$",
    r"^<(?:省略影音內容|媒体文件已省略|已忽略媒体文件|媒體已略過)>$",
    r"^\[(?:图片|圖片|照片|视频|視頻|影片|语音|語音|表情|贴纸|貼圖|文件|檔案|动画表情)\]$",
    r"^(?:图片|圖片|视频|視訊|影片|音频|音訊|贴纸|貼圖|文档|文件|gif)(?:已省略|已略過)$",
    r"^<без медиафайлов>$",
    r"^(?:изображение|видео|аудио|стикер|gif|документ) отсутствует$",
];

/// Built-in system notice patterns.
pub const SYSTEM_PATTERNS: &[&str] = &[
    // WhatsApp
    r"end-to-end encrypted",
    r"^(?:.{1,80} )?created (?:the )?group\b",
    r"joined using this group's invite link$",
    r"^(?:.{1,80} )?changed (?:the subject|this group's icon|the group description|the group name|their phone number)",
    r"deleted this group's icon$",
    r"security code (?:with .{1,80} )?changed",
    r"^(?:you're|you are) now an admin$",
    r" is now an admin$",
    r"turned (?:on|off) disappearing messages",
    r"^this message was deleted\.?$",
    r"^you deleted this message\.?$",
    r"^missed (?:group )?(?:voice|video) call",
    r"^waiting for this message",
    r"^(?:you|[^\s,.!?:]+(?: [^\s,.!?:]+){0,3}) (?:added|removed) (?:you|[^\s,.!?:]+(?: [^\s,.!?:]+){0,3})(?:(?:, | and )[^\s,.!?:]+(?: [^\s,.!?:]+){0,3})*$",
    r"^(?:you|[^\s,.!?:]+(?: [^\s,.!?:]+){0,3}) left$",
    r"^you were (?:added|removed)(?: by .{1,80})?$",
    r"^[^\s,.!?:]+(?: [^\s,.!?:]+){0,3} joined(?: from the community| using an invite link)?$",
    // Instagram
    r"^(?:.{1,80} )?liked a message$",
    r"^(?:.{1,80} )?unsent a message$",
    r"^reacted .{1,16} to your message$",
    r"^(?:.{1,80} )?named the group\b",
    r"^(?:.{1,80} )?(?:added|removed) .{1,80} (?:to|from) the group\.?$",
    r"^(?:.{1,80} )?left the group\.?$",
    // Telegram
    r"^(?:.{1,80} )?pinned (?:a )?message$",
    r"^(?:.{1,80} )?joined the group(?: via invite link)?$",
    r"^(?:.{1,80} )?(?:create (?:group|channel)|invite members|remove members|join group by (?:link|request)|pin message|edit group (?:title|photo)|delete group photo|migrate (?:to supergroup|from group)|invite to group call|group call|phone call|set messages ttl|clear history)$",
    // Chinese
    r"端到端加密",
    r"(?:创建|創建|建立)了群(?:组|組|聊)",
    r"加入了群(?:组|組|聊)",
    r"(?:退出|离开|離開)了群(?:组|組|聊)",
    r"撤回了一(?:条|條)(?:消息|訊息)",
    r"^(?:此消息已(?:被)?删除|此訊息已刪除|你删除了此消息|你刪除了此訊息)$",
    r"(?:更改|修改|變更)了群(?:组|組)?(?:名称|名稱|图标|圖示|描述|說明)",
    r"(?:成为|成為)(?:了)?(?:管理员|管理員)",
    r"^未接(?:语音|视频|語音|視訊)(?:通话|通話)$",
    r"邀请.{1,80}加入了群聊",
    r"(?:安全码已更改|安全碼已變更)",
    r"^.{1,40}?(?:添加了|新增了|移除了|移出了).{1,80}$",
    r"^.{1,40}?已(?:退出|離開|离开)$",
    r"^你已被(?:添加|新增|移除|移出)",
    // Russian
    r"защищены сквозным шифрованием",
    r"создал\(а\) группу",
    r"изменил\(а\)? (?:тему|иконку группы|описание группы|номер телефона)",
    r"удалил\(а\)? иконку группы",
    r"присоединил(?:ся|ась|\(ся\)|\(ась\)) по ссылке",
    r"код безопасности изменён",
    r"теперь администратор",
    r"(?:включил|выключил)\(а\)? исчезающие сообщения",
    r"^(?:данное сообщение удалено|вы удалили данное сообщение)\.?$",
    r"^[^\s,.!?:]+(?: [^\s,.!?:]+){0,3} (?:добавил|удалил)(?:\(а\)|а|и)? [^\s,.!?:]+(?: [^\s,.!?:]+){0,3}(?:(?:, | и )[^\s,.!?:]+(?: [^\s,.!?:]+){0,3})*$",
    r"^[^\s,.!?:]+(?: [^\s,.!?:]+){0,3} (?:вышел|вышла|вышли|вышел\(а\))$",
    r"^вас (?:добавили|удалили)$",
];

fn compile(category: &'static str, pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| ChatsiftError::invalid_pattern(category, pattern, e))
}

fn compile_builtin(category: &'static str, patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| compile(category, p).expect("built-in noise pattern must compile"))
        .collect()
}

static BUILTIN_MEDIA: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile_builtin("media", MEDIA_PATTERNS));

static BUILTIN_SYSTEM: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile_builtin("system", SYSTEM_PATTERNS));

static DEFAULT_FILTER: LazyLock<NoiseFilter> = LazyLock::new(NoiseFilter::new);

/// Category of a removed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseKind {
    Media,
    System,
}

/// Ordered media and system pattern lists.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    media: Vec<Regex>,
    system: Vec<Regex>,
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl NoiseFilter {
    /// Creates a filter with the built-in pattern lists.
    pub fn new() -> Self {
        Self {
            media: BUILTIN_MEDIA.clone(),
            system: BUILTIN_SYSTEM.clone(),
        }
    }

    /// Creates a filter without any pattern. It keeps every message.
    pub fn empty() -> Self {
        Self {
            media: Vec::new(),
            system: Vec::new(),
        }
    }

    /// Appends a media pattern (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ChatsiftError::InvalidPattern`] if the pattern does not compile.
    pub fn with_media_pattern(mut self, pattern: &str) -> Result<Self> {
        self.media.push(compile("media", pattern)?);
        Ok(self)
    }

    /// Appends a system pattern (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ChatsiftError::InvalidPattern`] if the pattern does not compile.
    pub fn with_system_pattern(mut self, pattern: &str) -> Result<Self> {
        self.system.push(compile("system", pattern)?);
        Ok(self)
    }

    /// Number of media and system patterns.
    pub fn pattern_counts(&self) -> (usize, usize) {
        (self.media.len(), self.system.len())
    }

    /// Classifies one message. `None` means the message is kept.
    pub fn classify(&self, message: &RawMessage) -> Option<NoiseKind> {
        let body = message.message.trim();
        if self.media.iter().any(|re| re.is_match(body)) {
            Some(NoiseKind::Media)
        } else if self.system.iter().any(|re| re.is_match(body)) {
            Some(NoiseKind::System)
        } else {
            None
        }
    }

    /// Removes noise in a single pass, keeping the order of the rest.
    ///
    /// Returns an empty list, not the input, when every message is noise.
    pub fn filter(&self, messages: Vec<RawMessage>) -> (Vec<RawMessage>, FilterStats) {
        let mut stats = FilterStats::default();
        let total = messages.len();

        let kept: Vec<RawMessage> = messages
            .into_iter()
            .filter(|message| match self.classify(message) {
                Some(kind) => {
                    trace!(?kind, sender = %message.sender, "removed noise");
                    match kind {
                        NoiseKind::Media => stats.media += 1,
                        NoiseKind::System => stats.system += 1,
                    }
                    false
                }
                None => true,
            })
            .collect();

        debug!(total, kept = kept.len(), media = stats.media, system = stats.system, "filtered noise");
        (kept, stats)
    }
}

/// Filters with the built-in pattern lists.
pub fn filter(messages: Vec<RawMessage>) -> (Vec<RawMessage>, FilterStats) {
    DEFAULT_FILTER.filter(messages)
}
