//! 长度档位规整服务 - 业务能力层
//!
//! 让三个错误选项分别落在 SHORT / MEDIUM / LONG 三档，
//! 使答案长度不再暴露哪一个是正确选项。正确选项永远不改写。

use crate::models::{LengthTier, QuizOption, RewriteRules, ANSWER_PLACEHOLDER};
use rand::Rng;

/// 长度档位规整器
pub struct LengthNormalizer<'r> {
    rules: &'r RewriteRules,
}

impl<'r> LengthNormalizer<'r> {
    pub fn new(rules: &'r RewriteRules) -> Self {
        Self { rules }
    }

    /// 规整一道题的错误选项，返回被改写的选项数
    ///
    /// 错误选项按当前长度升序排名（稳定排序），排名 0/1/2 依次对应
    /// SHORT/MEDIUM/LONG。已在目标档内且非空的保持不变，否则从目标档模板库抽取改写。
    /// 所有抽取都来自传入的随机源。
    pub fn normalize<R: Rng + ?Sized>(&self, options: &mut [QuizOption], rng: &mut R) -> usize {
        let thresholds = self.rules.thresholds();

        let mut wrong: Vec<usize> = options
            .iter()
            .enumerate()
            .filter(|(_, o)| !o.is_correct)
            .map(|(i, _)| i)
            .collect();
        wrong.sort_by_key(|&i| options[i].char_len());

        let mut rewritten = 0;
        for (&index, target) in wrong.iter().zip(LengthTier::BY_RANK) {
            let option = &mut options[index];
            if !option.text.is_empty() && option.length_tier(thresholds) == target {
                continue;
            }
            option.text = self.rewrite(&option.text, target, rng);
            rewritten += 1;
        }

        rewritten
    }

    /// 生成目标档位的改写文本
    ///
    /// 先用带 `{answer}` 的模板插入原答案；渲染结果不在目标档、
    /// 原答案为空或本档没有模板时，改用通用兜底短语（规则校验保证兜底短语在档内）。
    pub fn rewrite<R: Rng + ?Sized>(&self, original: &str, target: LengthTier, rng: &mut R) -> String {
        let bank = self.rules.bank(target);
        let anchor = anchor_text(original);

        if !anchor.is_empty() {
            if let Some(template) = bank.pick_template(rng) {
                let rendered = template.replace(ANSWER_PLACEHOLDER, &anchor);
                if self.rules.thresholds().classify(&rendered) == target {
                    return rendered;
                }
            }
        }

        match bank.pick_fallback(rng) {
            Some(phrase) => phrase.to_string(),
            // 校验过的规则不会走到这里；保底不输出空答案
            None if !original.trim().is_empty() => original.to_string(),
            None => target.to_string(),
        }
    }
}

/// 插入模板前的原答案：去掉首尾空白和结尾标点，整体小写
fn anchor_text(original: &str) -> String {
    original
        .trim()
        .trim_end_matches(['.', '!', '?', ';', ','])
        .trim_end()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn options(correct: &str, wrong: [&str; 3]) -> Vec<QuizOption> {
        let mut v = vec![QuizOption::new(correct, true)];
        v.extend(wrong.iter().map(|w| QuizOption::new(*w, false)));
        v
    }

    fn wrong_tiers(options: &[QuizOption], rules: &RewriteRules) -> HashSet<LengthTier> {
        options
            .iter()
            .filter(|o| !o.is_correct)
            .map(|o| o.length_tier(rules.thresholds()))
            .collect()
    }

    #[test]
    fn test_wrong_answers_span_three_tiers() {
        let rules = RewriteRules::default();
        let normalizer = LengthNormalizer::new(&rules);
        let mut rng = StdRng::seed_from_u64(42);

        let mut opts = options(
            "RAG improves retrieval accuracy",
            ["No", "It does nothing useful at all honestly speaking", "Maybe"],
        );
        let rewritten = normalizer.normalize(&mut opts, &mut rng);

        assert_eq!(rewritten, 2);
        assert_eq!(wrong_tiers(&opts, &rules).len(), 3);
        assert_eq!(opts[0].text, "RAG improves retrieval accuracy");
        // 最短的 "No" 已是 SHORT，保持不变
        assert!(opts.iter().any(|o| o.text == "No"));
    }

    #[test]
    fn test_rewrites_stay_anchored_to_original() {
        let rules = RewriteRules::default();
        let normalizer = LengthNormalizer::new(&rules);
        let mut rng = StdRng::seed_from_u64(7);

        let text = normalizer.rewrite("Using Larger Chunks.", LengthTier::Long, &mut rng);
        assert!(text.contains("using larger chunks"));
        assert_eq!(rules.thresholds().classify(&text), LengthTier::Long);
    }

    #[test]
    fn test_correct_option_never_rewritten() {
        let rules = RewriteRules::default();
        let normalizer = LengthNormalizer::new(&rules);

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut opts = options("x", ["", "", ""]);
            normalizer.normalize(&mut opts, &mut rng);
            assert_eq!(opts[0].text, "x");
            assert!(opts.iter().all(|o| !o.text.is_empty()));
            assert_eq!(wrong_tiers(&opts, &rules).len(), 3);
        }
    }

    #[test]
    fn test_all_long_wrong_answers_still_get_three_tiers() {
        let rules = RewriteRules::default();
        let normalizer = LengthNormalizer::new(&rules);
        let long = "This answer is deliberately written to be well over one hundred characters long so that it starts in the long tier";

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut opts = options("Short correct", [long, long, long]);
            normalizer.normalize(&mut opts, &mut rng);
            assert_eq!(wrong_tiers(&opts, &rules).len(), 3, "seed {}", seed);
        }
    }

    #[test]
    fn test_already_varied_answers_untouched() {
        let rules = RewriteRules::default();
        let normalizer = LengthNormalizer::new(&rules);
        let mut rng = StdRng::seed_from_u64(3);
        let medium = "A medium answer that sits between forty and one hundred chars";
        let long = "A long answer that goes on and on to comfortably exceed the one hundred character boundary for sure, really";

        let mut opts = options("Correct", ["Tiny", medium, long]);
        let before = opts.clone();
        assert_eq!(normalizer.normalize(&mut opts, &mut rng), 0);
        assert_eq!(opts, before);
    }

    #[test]
    fn test_same_seed_same_choices() {
        let rules = RewriteRules::default();
        let normalizer = LengthNormalizer::new(&rules);
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut opts = options("Correct", ["a", "b", "c"]);
            normalizer.normalize(&mut opts, &mut rng);
            opts
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn test_anchor_text() {
        assert_eq!(anchor_text("  Use BM25 only. "), "use bm25 only");
        assert_eq!(anchor_text("Why?!"), "why");
        assert_eq!(anchor_text(""), "");
    }
}
