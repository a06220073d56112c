//! 测验标记方言
//!
//! 描述"题目列表区域 / 题目块 / 标题 / 选项 / 正确性标记"在标记中的样子。
//! 默认值对应教程页面：
//!
//! ```html
//! <div id="quiz" class="content-section">
//!   <div class="quiz-container">
//!     <div class="quiz-question">
//!       <h3>Question 1: What does RAG stand for?</h3>
//!       <div class="quiz-option" onclick="checkAnswer(this, false)">A) ...</div>
//!       <div class="quiz-option" onclick="checkAnswer(this, true)">B) ...</div>
//!       ...
//!     </div>
//!   </div>
//! </div>
//! ```

use crate::error::ConfigError;
use regex::Regex;
use std::sync::OnceLock;

/// 正确性标记的默认正则，必须包含命名分组 `flag`（取值 `true` / `false`）
pub const DEFAULT_MARKER_PATTERN: &str = r"checkAnswer\(\s*this\s*,\s*(?P<flag>true|false)\s*\)";

/// 标题题号的默认正则，必须包含一个数字分组
pub const DEFAULT_ORDINAL_PATTERN: &str = r"(?i)^\s*(?:question|q)\s*(\d+)\s*[:.)]?\s*";

/// 标签与正文之间允许的分隔符
pub const LABEL_DELIMITERS: [char; 3] = [')', '.', ':'];

/// 教程页面原有的标签，无论配置如何都能识别
const CANONICAL_LABELS: [&str; 4] = ["A", "B", "C", "D"];

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// 测验标记方言
#[derive(Debug, Clone)]
pub struct QuizMarkup {
    /// 题目列表区域元素的 `id`
    pub region_id: String,
    /// 题目块元素的类名
    pub question_class: String,
    /// 选项元素的类名
    pub option_class: String,
    /// 标题元素的标签名
    pub header_tag: String,
    marker: Regex,
    ordinal: Regex,
}

impl Default for QuizMarkup {
    fn default() -> Self {
        static MARKER: OnceLock<Regex> = OnceLock::new();
        static ORDINAL: OnceLock<Regex> = OnceLock::new();
        Self {
            region_id: "quiz".to_string(),
            question_class: "quiz-question".to_string(),
            option_class: "quiz-option".to_string(),
            header_tag: "h3".to_string(),
            marker: MARKER
                .get_or_init(|| Regex::new(DEFAULT_MARKER_PATTERN).expect("标记正则是常量"))
                .clone(),
            ordinal: ORDINAL
                .get_or_init(|| Regex::new(DEFAULT_ORDINAL_PATTERN).expect("题号正则是常量"))
                .clone(),
        }
    }
}

impl QuizMarkup {
    /// 自定义正确性标记，正则中必须有 `flag` 命名分组
    pub fn with_marker_pattern(mut self, pattern: &str) -> Result<Self, ConfigError> {
        let marker = compile(pattern)?;
        if marker.capture_names().flatten().all(|name| name != "flag") {
            return Err(ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                source: regex::Error::Syntax("缺少命名分组 flag".to_string()),
            });
        }
        self.marker = marker;
        Ok(self)
    }

    /// 从选项开标签中读取正确性标记
    pub fn read_marker(&self, open_tag: &str) -> Option<bool> {
        self.marker
            .captures(open_tag)
            .and_then(|caps| caps.name("flag"))
            .map(|flag| flag.as_str() == "true")
    }

    /// 把开标签中的正确性标记改写为给定值，其余字节不变
    pub fn write_marker(&self, open_tag: &str, is_correct: bool) -> String {
        let Some(flag) = self.marker.captures(open_tag).and_then(|caps| caps.name("flag")) else {
            return open_tag.to_string();
        };
        let value = if is_correct { "true" } else { "false" };
        let mut out = String::with_capacity(open_tag.len() + 1);
        out.push_str(&open_tag[..flag.start()]);
        out.push_str(value);
        out.push_str(&open_tag[flag.end()..]);
        out
    }

    /// 拆分标题文本为（题号, 题干）
    pub fn split_header<'t>(&self, header_text: &'t str) -> (Option<u32>, &'t str) {
        match self.ordinal.captures(header_text) {
            Some(caps) => {
                let ordinal = caps.get(1).and_then(|m| m.as_str().parse().ok());
                let consumed = caps.get(0).map(|m| m.end()).unwrap_or(0);
                (ordinal, header_text[consumed..].trim())
            }
            None => (None, header_text.trim()),
        }
    }
}

/// 选项位置标签（`A)`、`1.` 之类）的识别规则
///
/// 识别配置的标签和 `A`–`D`，区分大小写。标签后必须紧跟一个分隔符，
/// 分隔符后必须是空白或文本结尾，因此 `a.k.a. embeddings` 这类正文不会被误剥。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionLabels {
    /// 按长度降序，`10` 优先于 `1`
    labels: Vec<String>,
}

impl Default for OptionLabels {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl OptionLabels {
    pub fn new(configured: &[String]) -> Self {
        let mut labels: Vec<String> = configured
            .iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .chain(CANONICAL_LABELS.iter().map(|l| l.to_string()))
            .collect();
        labels.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        labels.dedup();
        Self { labels }
    }

    /// 剥离位置标签，返回（分隔符, 正文）
    ///
    /// `"A) RAG"` → `(Some(')'), "RAG")`；没有标签时返回 `(None, 原文)`。
    pub fn strip<'t>(&self, text: &'t str) -> (Option<char>, &'t str) {
        let text = text.trim();
        for label in &self.labels {
            let Some(rest) = text.strip_prefix(label.as_str()) else {
                continue;
            };
            let mut chars = rest.chars();
            let Some(delimiter) = chars.next().filter(|c| LABEL_DELIMITERS.contains(c)) else {
                continue;
            };
            let body = chars.as_str();
            if body.is_empty() || body.starts_with(char::is_whitespace) {
                return (Some(delimiter), body.trim());
            }
        }
        (None, text)
    }
}
