//! 选项提取服务 - 业务能力层
//!
//! 只处理单个题目块：找到标题和四个选项，读取正确性标记，剥离位置标签。
//! 只看题目元素的直接子元素，块外或更深层的类选项标记不会被误认。

use crate::error::SkipReason;
use crate::infrastructure::{MarkupTree, OptionLabels, QuizMarkup};
use crate::models::{OptionShell, ParsedQuestion, QuestionLayout, QuizOption};

/// 每道题必须恰好有的选项数
pub const OPTION_COUNT: usize = 4;

/// 从题目块中提取题目
///
/// # 参数
/// - `block`: 题目元素的完整原文（从开标签到闭标签）
/// - `markup`: 标记方言
/// - `labels`: 可剥离的位置标签
///
/// # 返回
/// 成功返回恰好 4 个选项、恰好 1 个正确的题目；否则返回保留原样的原因
pub fn extract_question(
    block: &str,
    markup: &QuizMarkup,
    labels: &OptionLabels,
) -> Result<ParsedQuestion, SkipReason> {
    let tree = MarkupTree::parse(block);

    let root = tree
        .roots()
        .find(|&i| tree.get(i).map(|e| e.is_closed()).unwrap_or(false))
        .ok_or(SkipReason::MissingHeader)?;
    let children = tree.get(root).map(|e| e.children.as_slice()).unwrap_or(&[]);

    // 1. 标题
    let header_inner = children
        .iter()
        .filter_map(|&i| tree.get(i))
        .find(|e| e.name == markup.header_tag)
        .and_then(|e| e.inner())
        .ok_or(SkipReason::MissingHeader)?;
    let (ordinal, prompt) = markup.split_header(&block[header_inner]);

    // 2. 选项（直接子元素）
    let positions: Vec<usize> = children
        .iter()
        .enumerate()
        .filter(|&(_, &i)| tree.has_class(i, &markup.option_class))
        .map(|(pos, _)| pos)
        .collect();

    if positions.len() != OPTION_COUNT {
        return Err(SkipReason::OptionCountMismatch {
            found: positions.len(),
        });
    }

    // 选项必须连续出现，中间只能有空白
    let first = positions[0];
    let last = positions[OPTION_COUNT - 1];
    if last - first + 1 != OPTION_COUNT {
        let offending = (first..=last)
            .position(|p| !positions.contains(&p))
            .unwrap_or(0);
        return Err(SkipReason::MalformedOption {
            index: offending + 1,
            detail: "选项之间夹有其他元素",
        });
    }

    let mut options = Vec::with_capacity(OPTION_COUNT);
    let mut spans = Vec::with_capacity(OPTION_COUNT);
    let mut delimiter = None;

    for (n, &pos) in positions.iter().enumerate() {
        let index = n + 1;
        let element = tree
            .get(children[pos])
            .ok_or(SkipReason::OptionCountMismatch { found: n })?;

        let (Some(span), Some(inner), Some(close)) =
            (element.span(), element.inner(), element.close.clone())
        else {
            return Err(SkipReason::MalformedOption {
                index,
                detail: "选项元素未闭合",
            });
        };

        if !element.children.is_empty() {
            return Err(SkipReason::MalformedOption {
                index,
                detail: "选项文本中含有子标签",
            });
        }

        let open_tag = tree.open_tag(children[pos]);
        let is_correct = markup
            .read_marker(open_tag)
            .ok_or(SkipReason::MalformedOption {
                index,
                detail: "缺少正确性标记",
            })?;

        let raw = &block[inner];
        let body = raw.trim();
        let leading = &raw[..raw.len() - raw.trim_start().len()];
        let trailing = &raw[raw.trim_end().len()..];
        let (label_delimiter, text) = labels.strip(body);
        delimiter = delimiter.or(label_delimiter);

        options.push(
            QuizOption::new(text, is_correct).with_shell(OptionShell {
                open_tag: open_tag.to_string(),
                leading: leading.to_string(),
                trailing: trailing.to_string(),
                close_tag: block[close].to_string(),
            }),
        );
        spans.push(span);
    }

    for pair in spans.windows(2) {
        if !block[pair[0].end..pair[1].start].trim().is_empty() {
            return Err(SkipReason::MalformedOption {
                index: 0,
                detail: "选项之间夹有文本",
            });
        }
    }

    let correct = options.iter().filter(|o| o.is_correct).count();
    if correct != 1 {
        return Err(SkipReason::CorrectCountMismatch { found: correct });
    }

    let layout = QuestionLayout {
        options_span: spans[0].start..spans[OPTION_COUNT - 1].end,
        separators: spans
            .windows(2)
            .map(|pair| block[pair[0].end..pair[1].start].to_string())
            .collect(),
        label_delimiter: delimiter.unwrap_or(')'),
    };

    Ok(ParsedQuestion {
        ordinal,
        prompt: prompt.to_string(),
        options,
        layout,
    })
}
