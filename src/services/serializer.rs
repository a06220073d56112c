//! 题目序列化服务 - 业务能力层
//!
//! 把打乱后的选项放回原题目块的外壳：选项区域之前和之后的字节原样保留，
//! 选项之间按位置沿用原始空白。

use crate::infrastructure::QuizMarkup;
use crate::models::{LabeledOption, QuestionLayout};

/// 重建题目块
///
/// # 参数
/// - `block`: 原题目块
/// - `layout`: 提取时记录的选项区域位置与格式
/// - `options`: 打乱并重新编号后的选项
/// - `markup`: 标记方言（用于改写正确性标记）
pub fn serialize_question(
    block: &str,
    layout: &QuestionLayout,
    options: &[LabeledOption],
    markup: &QuizMarkup,
) -> String {
    let mut out = String::with_capacity(block.len() + 256);
    out.push_str(&block[..layout.options_span.start]);
    for (slot, labeled) in options.iter().enumerate() {
        if slot > 0 {
            let gap = layout.separators.get(slot - 1).or(layout.separators.last());
            out.push_str(gap.map(String::as_str).unwrap_or(""));
        }
        out.push_str(&render_option(labeled, layout.label_delimiter, markup));
    }
    out.push_str(&block[layout.options_span.end..]);
    out
}

/// 渲染单个选项：开标签 + 空白 + `标签) 正文` + 空白 + 闭标签
fn render_option(labeled: &LabeledOption, delimiter: char, markup: &QuizMarkup) -> String {
    let option = &labeled.option;
    let shell = &option.shell;
    format!(
        "{}{}{}{} {}{}{}",
        markup.write_marker(&shell.open_tag, option.is_correct),
        shell.leading,
        labeled.label,
        delimiter,
        option.text,
        shell.trailing,
        shell.close_tag
    )
}
