use crate::models::option::QuizOption;
use std::ops::Range;

/// 从题目块中解析出的题目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuestion {
    /// 标题中的题号（仅用于展示，标题本身从不改写）
    pub ordinal: Option<u32>,
    /// 题干
    pub prompt: String,
    /// 恰好 4 个选项，其中恰好 1 个正确
    pub options: Vec<QuizOption>,
    /// 题目块的排版信息
    pub layout: QuestionLayout,
}

impl ParsedQuestion {
    /// 正确选项的文本
    pub fn correct_text(&self) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.is_correct)
            .map(|o| o.text.as_str())
    }
}

/// 题目块中选项区域的位置与格式
///
/// 所有偏移都相对于题目块本身。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionLayout {
    /// 第一个选项开标签到最后一个选项闭标签的字节范围
    pub options_span: Range<usize>,
    /// 相邻选项之间的原始空白，按位置依次对应第 1-2、2-3、3-4 个选项之间
    pub separators: Vec<String>,
    /// 标签分隔符，例如 `A)` 中的 `)`
    pub label_delimiter: char,
}
