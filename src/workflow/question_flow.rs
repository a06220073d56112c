//! 题目处理流程 - 流程层
//!
//! 核心职责：定义"一道题"的完整处理流程
//!
//! 流程顺序：
//! 1. extract → 提取标题与四个选项
//! 2. normalize → 错误选项分档改写
//! 3. shuffle → 打乱并重新编号
//! 4. serialize → 放回原外壳
//!
//! 任一步无法安全进行时返回 `Skipped`，调用方保留原始字节。

use rand::Rng;

use crate::error::SkipReason;
use crate::infrastructure::{OptionLabels, QuizMarkup};
use crate::models::RewriteRules;
use crate::services::{extract_question, serialize_question, LengthNormalizer, Shuffler};

/// 题目处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessResult {
    /// 已重建
    Transformed(TransformedQuestion),
    /// 原样保留
    Skipped(SkipReason),
}

/// 重建后的题目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedQuestion {
    pub text: String,
    pub ordinal: Option<u32>,
    pub prompt: String,
    /// 被改写的错误选项数
    pub rewritten: usize,
    /// 正确选项的新位置（从 0 开始）
    pub correct_slot: usize,
}

/// 题目处理流程
///
/// - 编排单道题的 提取 → 规整 → 打乱 → 序列化
/// - 不持有随机源，随机源由文档层按题目顺序传入
/// - 不做任何 I/O
pub struct QuestionFlow<'a> {
    markup: &'a QuizMarkup,
    labels: OptionLabels,
    normalizer: LengthNormalizer<'a>,
    shuffler: Shuffler<'a>,
}

impl<'a> QuestionFlow<'a> {
    /// 创建新的题目处理流程
    pub fn new(rules: &'a RewriteRules, markup: &'a QuizMarkup) -> Self {
        Self {
            markup,
            labels: OptionLabels::new(rules.labels()),
            normalizer: LengthNormalizer::new(rules),
            shuffler: Shuffler::new(rules.labels()),
        }
    }

    pub fn run<R: Rng + ?Sized>(&self, block: &str, rng: &mut R) -> ProcessResult {
        let mut parsed = match extract_question(block, self.markup, &self.labels) {
            Ok(parsed) => parsed,
            Err(reason) => return ProcessResult::Skipped(reason),
        };

        let rewritten = self.normalizer.normalize(&mut parsed.options, rng);
        let labeled = self.shuffler.shuffle(parsed.options, rng);
        let correct_slot = labeled
            .iter()
            .position(|o| o.option.is_correct)
            .unwrap_or_default();

        let text = serialize_question(block, &parsed.layout, &labeled, self.markup);

        ProcessResult::Transformed(TransformedQuestion {
            text,
            ordinal: parsed.ordinal,
            prompt: parsed.prompt,
            rewritten,
            correct_slot,
        })
    }
}
