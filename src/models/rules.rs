//! 错误选项改写规则
//!
//! 长度阈值、选项标签和三档模板库都是显式配置，默认值是一套固定的规范模板，
//! 也可以从 TOML 文件整体或部分覆盖（见 `loaders::toml_loader`）。
//!
//! 规则只能通过 [`RewriteRules::default`] 或校验后的反序列化得到，
//! 因此规则对象始终满足：
//! - `0 < short_max < long_min`
//! - 恰好 4 个标签
//! - 每档至少一条兜底短语，且兜底短语长度落在本档内
//! - 每条模板都含 `{answer}` 占位符
//! - 模板和短语中不含 `<` / `&`

use crate::error::RulesError;
use crate::models::option::{LengthTier, TierThresholds};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// 模板中原始答案的占位符
pub const ANSWER_PLACEHOLDER: &str = "{answer}";

/// 某一档的模板库
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBank {
    /// 含 `{answer}` 的模板，插入小写化的原答案，使改写后的选项仍贴近原题
    #[serde(default)]
    pub templates: Vec<String>,
    /// 不依赖原答案的通用短语；模板渲染后仍不在本档、或原答案为空时使用
    #[serde(default)]
    pub fallbacks: Vec<String>,
}

impl TierBank {
    fn new(templates: &[&str], fallbacks: &[&str]) -> Self {
        Self {
            templates: templates.iter().map(|s| s.to_string()).collect(),
            fallbacks: fallbacks.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// 随机抽取一条模板
    pub fn pick_template<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        if self.templates.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.templates.len());
        Some(self.templates[index].as_str())
    }

    /// 随机抽取一条兜底短语
    pub fn pick_fallback<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        if self.fallbacks.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.fallbacks.len());
        Some(self.fallbacks[index].as_str())
    }
}

/// 改写规则（已校验）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRewriteRules", into = "RawRewriteRules")]
pub struct RewriteRules {
    thresholds: TierThresholds,
    labels: Vec<String>,
    short: TierBank,
    medium: TierBank,
    long: TierBank,
}

impl RewriteRules {
    pub fn thresholds(&self) -> &TierThresholds {
        &self.thresholds
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn bank(&self, tier: LengthTier) -> &TierBank {
        match tier {
            LengthTier::Short => &self.short,
            LengthTier::Medium => &self.medium,
            LengthTier::Long => &self.long,
        }
    }

    /// 从 TOML 文本解析规则，缺省的字段使用默认值
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

impl Default for RewriteRules {
    fn default() -> Self {
        let raw = RawRewriteRules::default();
        Self {
            thresholds: raw.thresholds,
            labels: raw.labels,
            short: raw.short,
            medium: raw.medium,
            long: raw.long,
        }
    }
}

/// 未校验的规则，作为 serde 的中间形态
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRewriteRules {
    pub thresholds: TierThresholds,
    pub labels: Vec<String>,
    pub short: TierBank,
    pub medium: TierBank,
    pub long: TierBank,
}

impl Default for RawRewriteRules {
    fn default() -> Self {
        Self {
            thresholds: TierThresholds::default(),
            labels: ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect(),
            short: TierBank::new(
                &[],
                &[
                    "This is incorrect",
                    "Not applicable here",
                    "This does not apply",
                    "Incorrect approach",
                    "Not the right method",
                    "Only partially correct",
                ],
            ),
            medium: TierBank::new(
                &[
                    "While {answer} might seem reasonable, it does not work well in practice",
                    "Although {answer} could work in theory, it is not recommended here",
                    "Relying on {answer} is not suitable and would lead to poor results",
                    "While {answer} looks straightforward, it introduces new complications",
                ],
                &[
                    "While this might seem reasonable, it is not the correct approach for this problem",
                    "This method does not work well in practice and introduces unnecessary complexity",
                    "This approach is outdated and has been replaced by better techniques",
                    "While partially correct, this answer misses several critical aspects",
                    "This is a common misconception that does not hold up in production",
                ],
            ),
            long: TierBank::new(
                &[
                    "While {answer} might seem reasonable at first glance, this approach introduces significant complications and does not address the core requirements effectively",
                    "Although {answer} appears to be a valid solution on the surface, practical implementation reveals that it fails to meet performance, accuracy, and scalability requirements",
                    "The idea of {answer} has been considered in various contexts, but real-world deployments show it does not scale well and creates more problems than it solves",
                    "While {answer} could work in some limited scenarios, it is not the recommended approach because it introduces unnecessary complexity that undermines system reliability",
                ],
                &[
                    "This comprehensive approach involves multiple steps including preprocessing, normalization, and validation, but it is not the correct method for this specific use case and would degrade performance",
                    "While this technique has been used successfully in other domains like traditional information retrieval, it does not apply to the architecture discussed here and misses the semantic requirements",
                    "This method requires extensive setup including complex algorithms, additional infrastructure, and specialized tools, but it is not the primary solution for the problem at hand",
                    "Although this approach seems comprehensive and covers scalability, performance, and reliability, it actually addresses a different problem than the one being solved here",
                ],
            ),
        }
    }
}

impl TryFrom<RawRewriteRules> for RewriteRules {
    type Error = RulesError;

    fn try_from(raw: RawRewriteRules) -> Result<Self, Self::Error> {
        let thresholds = raw.thresholds;
        if thresholds.short_max == 0 || thresholds.short_max >= thresholds.long_min {
            return Err(RulesError::InvalidThresholds {
                short_max: thresholds.short_max,
                long_min: thresholds.long_min,
            });
        }

        if raw.labels.len() != 4 {
            return Err(RulesError::LabelCount {
                found: raw.labels.len(),
            });
        }

        for (i, label) in raw.labels.iter().enumerate() {
            let unusable = label.is_empty()
                || label.contains(|c: char| c.is_whitespace() || c == '<' || c == '&')
                || raw.labels[..i].contains(label);
            if unusable {
                return Err(RulesError::InvalidLabel {
                    label: label.clone(),
                });
            }
        }

        for (tier, bank) in [
            (LengthTier::Short, &raw.short),
            (LengthTier::Medium, &raw.medium),
            (LengthTier::Long, &raw.long),
        ] {
            validate_bank(tier, bank, &thresholds)?;
        }

        Ok(Self {
            thresholds,
            labels: raw.labels,
            short: raw.short,
            medium: raw.medium,
            long: raw.long,
        })
    }
}

impl From<RewriteRules> for RawRewriteRules {
    fn from(rules: RewriteRules) -> Self {
        Self {
            thresholds: rules.thresholds,
            labels: rules.labels,
            short: rules.short,
            medium: rules.medium,
            long: rules.long,
        }
    }
}

fn validate_bank(
    tier: LengthTier,
    bank: &TierBank,
    thresholds: &TierThresholds,
) -> Result<(), RulesError> {
    if bank.fallbacks.is_empty() {
        return Err(RulesError::EmptyFallbacks {
            tier: tier.to_string(),
        });
    }

    for text in bank.templates.iter().chain(bank.fallbacks.iter()) {
        if text.contains('<') || text.contains('&') {
            return Err(RulesError::MarkupInText { text: text.clone() });
        }
    }

    if let Some(template) = bank
        .templates
        .iter()
        .find(|t| !t.contains(ANSWER_PLACEHOLDER))
    {
        return Err(RulesError::MissingPlaceholder {
            tier: tier.to_string(),
            template: template.clone(),
        });
    }

    // 空短语属于 SHORT 档，但改写结果不允许为空
    if let Some(phrase) = bank
        .fallbacks
        .iter()
        .find(|p| p.trim().is_empty() || thresholds.classify(p) != tier)
    {
        return Err(RulesError::FallbackOutOfTier {
            tier: tier.to_string(),
            phrase: phrase.clone(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_rules_pass_validation() {
        let raw = RawRewriteRules::default();
        let rules = RewriteRules::try_from(raw).expect("默认规则应通过校验");
        assert_eq!(rules, RewriteRules::default());
        assert_eq!(rules.labels(), ["A", "B", "C", "D"]);
    }

    #[test]
    fn test_default_long_templates_are_long_even_without_answer() {
        let rules = RewriteRules::default();
        for template in &rules.bank(LengthTier::Long).templates {
            let rendered = template.replace(ANSWER_PLACEHOLDER, "");
            assert_eq!(rules.thresholds().classify(&rendered), LengthTier::Long);
        }
    }

    #[test]
    fn test_partial_toml_overrides_only_given_fields() {
        let rules = RewriteRules::from_toml_str(
            r#"
            [thresholds]
            short_max = 30
            long_min = 100
            "#,
        )
        .unwrap();
        assert_eq!(rules.thresholds().short_max, 30);
        assert_eq!(
            rules.bank(LengthTier::Long),
            RewriteRules::default().bank(LengthTier::Long)
        );
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let raw = RawRewriteRules {
            thresholds: TierThresholds {
                short_max: 100,
                long_min: 40,
            },
            ..Default::default()
        };
        assert_eq!(
            RewriteRules::try_from(raw),
            Err(RulesError::InvalidThresholds {
                short_max: 100,
                long_min: 40
            })
        );
    }

    #[test]
    fn test_fallback_out_of_tier_rejected() {
        let mut raw = RawRewriteRules::default();
        raw.short.fallbacks.push("x".repeat(60));
        assert!(matches!(
            RewriteRules::try_from(raw),
            Err(RulesError::FallbackOutOfTier { .. })
        ));
    }

    #[test]
    fn test_template_without_placeholder_rejected_from_toml() {
        let result = RewriteRules::from_toml_str(
            r#"
            [medium]
            templates = ["No placeholder in this medium template at all, sorry"]
            fallbacks = ["This method does not work well in practice and adds complexity"]
            "#,
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("{answer}"));
    }

    #[test]
    fn test_wrong_label_count_rejected() {
        let result = RewriteRules::from_toml_str(r#"labels = ["A", "B", "C"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unusable_labels_rejected() {
        for labels in [
            r#"labels = ["1", "2", "", "4"]"#,
            r#"labels = ["1", "2 b", "3", "4"]"#,
            r#"labels = ["1", "2", "2", "4"]"#,
        ] {
            assert!(RewriteRules::from_toml_str(labels).is_err(), "{}", labels);
        }
        let rules = RewriteRules::from_toml_str(r#"labels = ["1", "2", "3", "4"]"#).unwrap();
        assert_eq!(rules.labels(), ["1", "2", "3", "4"]);
    }

    #[test]
    fn test_pick_from_empty_templates_is_none() {
        let rules = RewriteRules::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(rules
            .bank(LengthTier::Short)
            .pick_template(&mut rng)
            .is_none());
        assert!(rules
            .bank(LengthTier::Short)
            .pick_fallback(&mut rng)
            .is_some());
    }
}
