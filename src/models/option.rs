use serde::{Deserialize, Serialize};
use std::fmt;

/// 选项文本长度档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthTier {
    Short,
    Medium,
    Long,
}

impl LengthTier {
    /// 按错误选项长度排名（升序）分配的目标档位
    pub const BY_RANK: [LengthTier; 3] = [LengthTier::Short, LengthTier::Medium, LengthTier::Long];

    pub fn as_str(&self) -> &'static str {
        match self {
            LengthTier::Short => "short",
            LengthTier::Medium => "medium",
            LengthTier::Long => "long",
        }
    }
}

impl fmt::Display for LengthTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 长度档位阈值（按字符计数）
///
/// - SHORT: `len < short_max`
/// - MEDIUM: `short_max <= len < long_min`
/// - LONG: `len >= long_min`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub short_max: usize,
    pub long_min: usize,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            short_max: 40,
            long_min: 100,
        }
    }
}

impl TierThresholds {
    /// 判断文本所属档位
    pub fn classify(&self, text: &str) -> LengthTier {
        let len = text.chars().count();
        if len < self.short_max {
            LengthTier::Short
        } else if len < self.long_min {
            LengthTier::Medium
        } else {
            LengthTier::Long
        }
    }
}

/// 选项在原始标记中的外壳
///
/// 记录开标签、文本前后空白和闭标签，序列化时原样放回，
/// 只替换正确性标记的取值。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptionShell {
    pub open_tag: String,
    pub leading: String,
    pub trailing: String,
    pub close_tag: String,
}

/// 一个答案选项
///
/// `text` 永远不带位置标签（`A)` 之类），标签只在序列化时加上。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOption {
    pub text: String,
    pub is_correct: bool,
    pub shell: OptionShell,
}

impl QuizOption {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
            shell: OptionShell::default(),
        }
    }

    pub fn with_shell(mut self, shell: OptionShell) -> Self {
        self.shell = shell;
        self
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn length_tier(&self, thresholds: &TierThresholds) -> LengthTier {
        thresholds.classify(&self.text)
    }
}

/// 打乱后带新标签的选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledOption {
    pub label: String,
    pub option: QuizOption,
}
