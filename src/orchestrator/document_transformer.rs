//! 单个文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责处理一份文档中的全部题目，是文档级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **定位区域**：在文档中找到题目列表区域（默认 `id="quiz"`）
//! 2. **收集题目**：区域内不嵌套在其他题目中的题目块，按文档顺序
//! 3. **流程调度**：创建并复用 `QuestionFlow`，整份文档共用一个随机源
//! 4. **拼接输出**：按字节范围把重建后的题目放回原位，其余字节不动
//! 5. **统计输出**：记录找到/重建/跳过数量
//!
//! 本层不做任何 I/O，同样的输入和种子永远得到同样的输出。

use crate::error::SkipReason;
use crate::infrastructure::{MarkupTree, QuizMarkup};
use crate::models::RewriteRules;
use crate::utils::logging::truncate_text;
use crate::workflow::{ProcessResult, QuestionCtx, QuestionFlow};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, warn};

/// 单份文档的处理报告
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    /// 是否找到题目列表区域
    pub region_found: bool,
    pub questions_found: usize,
    pub transformed: usize,
    /// 所有题目中被改写的错误选项总数
    pub rewritten_options: usize,
    pub skipped: Vec<SkippedQuestion>,
}

/// 被跳过（原样保留）的题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedQuestion {
    /// 题目在区域中的位置（从1开始）
    pub position: usize,
    pub reason: SkipReason,
}

/// 文档处理结果：新文本 + 报告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOutcome {
    pub text: String,
    pub report: DocumentReport,
}

/// 文档变换器
///
/// 持有改写规则与标记方言，可对任意多份文档重复使用。
#[derive(Debug, Clone, Default)]
pub struct DocumentTransformer {
    rules: RewriteRules,
    markup: QuizMarkup,
}

impl DocumentTransformer {
    pub fn new(rules: RewriteRules, markup: QuizMarkup) -> Self {
        Self { rules, markup }
    }

    /// 处理一份文档
    ///
    /// # 参数
    /// - `raw`: 文档原文
    /// - `seed`: 本文档的随机种子
    ///
    /// # 返回
    /// 返回新文本与处理报告；没有题目区域时文本与输入完全相同
    pub fn transform(&self, raw: &str, seed: u64) -> DocumentOutcome {
        self.transform_as("-", raw, seed)
    }

    /// 同 [`transform`](Self::transform)，`name` 仅用于日志
    pub fn transform_as(&self, name: &str, raw: &str, seed: u64) -> DocumentOutcome {
        let mut report = DocumentReport::default();
        let tree = MarkupTree::parse(raw);

        let Some(region) = tree.find_first(|i| {
            tree.attribute(i, "id") == Some(self.markup.region_id.as_str())
        }) else {
            debug!("[文档 {}] 未找到题目区域，原样保留", name);
            return DocumentOutcome {
                text: raw.to_string(),
                report,
            };
        };
        report.region_found = true;

        let questions = tree.outermost_within(region, |i| {
            tree.has_class(i, &self.markup.question_class)
        });
        report.questions_found = questions.len();

        let flow = QuestionFlow::new(&self.rules, &self.markup);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut text = String::with_capacity(raw.len() + raw.len() / 8);
        let mut cursor = 0;

        for (index, &element) in questions.iter().enumerate() {
            let Some(span) = tree.get(element).and_then(|e| e.span()) else {
                continue;
            };
            let ctx = QuestionCtx::new(name, index + 1, questions.len());
            let block = &raw[span.clone()];

            text.push_str(&raw[cursor..span.start]);
            match flow.run(block, &mut rng) {
                ProcessResult::Transformed(question) => {
                    debug!(
                        "{} ✓ 已重建「{}」: 改写 {} 个错误选项, 正确答案位于第 {} 位",
                        ctx,
                        truncate_text(&question.prompt, 30),
                        question.rewritten,
                        question.correct_slot + 1
                    );
                    report.transformed += 1;
                    report.rewritten_options += question.rewritten;
                    text.push_str(&question.text);
                }
                ProcessResult::Skipped(reason) => {
                    warn!("{} ⚠️ 跳过: {}", ctx, reason);
                    report.skipped.push(SkippedQuestion {
                        position: index + 1,
                        reason,
                    });
                    text.push_str(block);
                }
            }
            cursor = span.end;
        }
        text.push_str(&raw[cursor..]);

        DocumentOutcome { text, report }
    }
}

/// 用默认规则与默认标记方言处理一份文档
pub fn transform_document(raw_text: &str, seed: u64) -> String {
    DocumentTransformer::default().transform(raw_text, seed).text
}

/// 批量处理时第 `index` 份文档的种子
pub fn derive_seed(base: u64, index: u64) -> u64 {
    base.wrapping_add(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(flag: bool, text: &str) -> String {
        format!(
            "    <div class=\"quiz-option\" onclick=\"checkAnswer(this, {})\">{}</div>",
            flag, text
        )
    }

    fn question(n: u32, options: &[(bool, &str)]) -> String {
        let body: Vec<String> = options.iter().map(|(f, t)| option(*f, t)).collect();
        format!(
            "  <div class=\"quiz-question\">\n    <h3>Question {}: Prompt {}?</h3>\n{}\n  </div>",
            n,
            n,
            body.join("\n")
        )
    }

    fn valid(n: u32) -> String {
        question(
            n,
            &[
                (true, "A) The right one"),
                (false, "B) Wrong"),
                (false, "C) Also wrong"),
                (false, "D) Nope"),
            ],
        )
    }

    fn page(questions: &[String]) -> String {
        format!(
            "<!DOCTYPE html>\n<html><body>\n<h1>Chapter</h1>\n<div id=\"quiz\">\n{}\n</div>\n<script>if (a < b) {{ x(); }}</script>\n</body></html>\n",
            questions.join("\n")
        )
    }

    #[test]
    fn test_no_region_returns_input() {
        let raw = "<html><body><div class=\"quiz-question\">x</div></body></html>";
        let outcome = DocumentTransformer::default().transform(raw, 1);
        assert_eq!(outcome.text, raw);
        assert!(!outcome.report.region_found);
        assert_eq!(outcome.report.questions_found, 0);
    }

    #[test]
    fn test_empty_region_returns_input() {
        let raw = page(&[]);
        let outcome = DocumentTransformer::default().transform(&raw, 1);
        assert_eq!(outcome.text, raw);
        assert!(outcome.report.region_found);
        assert_eq!(outcome.report.questions_found, 0);
    }

    #[test]
    fn test_bytes_outside_questions_are_preserved() {
        let raw = page(&[valid(1), valid(2)]);
        let outcome = DocumentTransformer::default().transform(&raw, 5);

        assert_eq!(outcome.report.questions_found, 2);
        assert_eq!(outcome.report.transformed, 2);
        assert!(outcome
            .text
            .starts_with("<!DOCTYPE html>\n<html><body>\n<h1>Chapter</h1>\n<div id=\"quiz\">\n  <div class=\"quiz-question\">\n    <h3>Question 1: Prompt 1?</h3>\n"));
        assert!(outcome
            .text
            .ends_with("\n</div>\n<script>if (a < b) { x(); }</script>\n</body></html>\n"));
        assert!(outcome.text.contains("<h3>Question 2: Prompt 2?</h3>"));
    }

    #[test]
    fn test_invalid_question_is_skipped_and_siblings_transform() {
        let five = question(
            2,
            &[
                (true, "A) a"),
                (false, "B) b"),
                (false, "C) c"),
                (false, "D) d"),
                (false, "E) e"),
            ],
        );
        let raw = page(&[valid(1), five.clone(), valid(3)]);
        let outcome = DocumentTransformer::default().transform(&raw, 9);

        assert!(outcome.text.contains(&five));
        assert_eq!(outcome.report.transformed, 2);
        assert_eq!(
            outcome.report.skipped,
            vec![SkippedQuestion {
                position: 2,
                reason: SkipReason::OptionCountMismatch { found: 5 },
            }]
        );
    }

    #[test]
    fn test_same_seed_same_output() {
        let raw = page(&[valid(1), valid(2), valid(3)]);
        assert_eq!(transform_document(&raw, 7), transform_document(&raw, 7));
    }

    #[test]
    fn test_questions_outside_region_untouched() {
        let outside = valid(9);
        let raw = format!("{}\n{}", outside, page(&[valid(1)]));
        let out = transform_document(&raw, 3);
        assert!(out.starts_with(&outside));
    }

    #[test]
    fn test_rerun_with_custom_labels_keeps_texts_clean() {
        let rules = RewriteRules::from_toml_str(r#"labels = ["1", "2", "3", "4"]"#).unwrap();
        let transformer = DocumentTransformer::new(rules.clone(), QuizMarkup::default());
        let raw = page(&[valid(1), valid(2)]);

        let once = transformer.transform(&raw, 11).text;
        let twice = transformer.transform(&once, 12);
        assert_eq!(twice.report.transformed, 2);

        let labels = crate::infrastructure::OptionLabels::new(rules.labels());
        let tree = MarkupTree::parse(&twice.text);
        let region = tree.find_first(|i| tree.attribute(i, "id") == Some("quiz")).unwrap();
        for question in tree.outermost_within(region, |i| tree.has_class(i, "quiz-question")) {
            let span = tree.get(question).and_then(|e| e.span()).unwrap();
            let parsed = crate::services::extract_question(
                &twice.text[span],
                &QuizMarkup::default(),
                &labels,
            )
            .unwrap();
            assert_eq!(parsed.correct_text(), Some("The right one"));
            for option in &parsed.options {
                assert_eq!(labels.strip(&option.text), (None, option.text.as_str()));
            }
        }
        for stacked in ["1) 1)", ") 2) ", ") 3) ", ") 4) "] {
            assert!(!twice.text.contains(stacked), "{}", stacked);
        }
    }

    #[test]
    fn test_derive_seed() {
        assert_eq!(derive_seed(42, 3), 45);
        assert_eq!(derive_seed(u64::MAX, 1), 0);
    }
}
