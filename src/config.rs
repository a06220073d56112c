use crate::error::ConfigError;
use crate::infrastructure::QuizMarkup;
use std::path::PathBuf;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 待处理文档所在目录
    pub documents_dir: String,
    /// 文档文件名前缀
    pub file_prefix: String,
    /// 文档扩展名（不含点）
    pub file_extension: String,
    /// 要处理的章节编号
    pub chapters: Vec<u64>,
    /// 种子基数，章节 n 的种子为 `seed_base + n`
    pub seed_base: u64,
    /// 改写规则 TOML 文件；为空则使用默认规则
    pub rules_file: Option<String>,
    /// 只处理不写回
    pub dry_run: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 处理报告 JSON 输出路径
    pub report_file: Option<String>,
    // --- 标记方言 ---
    pub region_id: String,
    /// 自定义正确性标记正则（需包含名为 `flag` 的捕获组）
    pub marker_pattern: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            documents_dir: "templates/tutorials/rag".to_string(),
            file_prefix: "chapter".to_string(),
            file_extension: "html".to_string(),
            chapters: vec![3, 4, 5, 6, 7],
            seed_base: 42,
            rules_file: None,
            dry_run: false,
            verbose_logging: false,
            report_file: None,
            region_id: "quiz".to_string(),
            marker_pattern: None,
        }
    }
}

impl Config {
    /// 从环境变量读取配置，未设置的项使用默认值
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意键值来源读取配置
    ///
    /// # 参数
    /// - `lookup`: 按变量名取值，未设置返回 `None`
    ///
    /// # 返回
    /// 数值或布尔值无法解析时返回 `ConfigError::EnvVarParseFailed`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            documents_dir: lookup("DOCUMENTS_DIR").unwrap_or(default.documents_dir),
            file_prefix: lookup("FILE_PREFIX").unwrap_or(default.file_prefix),
            file_extension: lookup("FILE_EXTENSION").unwrap_or(default.file_extension),
            chapters: match lookup("CHAPTERS") {
                Some(v) => parse_chapters(&v)?,
                None => default.chapters,
            },
            seed_base: parse_or("SEED_BASE", lookup("SEED_BASE"), "u64", default.seed_base)?,
            rules_file: non_empty("RULES_FILE"),
            dry_run: parse_or("DRY_RUN", lookup("DRY_RUN"), "bool", default.dry_run)?,
            verbose_logging: parse_or(
                "VERBOSE_LOGGING",
                lookup("VERBOSE_LOGGING"),
                "bool",
                default.verbose_logging,
            )?,
            report_file: non_empty("REPORT_FILE"),
            region_id: lookup("QUIZ_REGION_ID").unwrap_or(default.region_id),
            marker_pattern: non_empty("MARKER_PATTERN"),
        })
    }

    /// 章节 n 对应的文档路径：`<dir>/<prefix><n>.<ext>`
    pub fn document_path(&self, chapter: u64) -> PathBuf {
        PathBuf::from(&self.documents_dir).join(format!(
            "{}{}.{}",
            self.file_prefix, chapter, self.file_extension
        ))
    }

    /// 按配置构造标记方言
    pub fn markup(&self) -> Result<QuizMarkup, ConfigError> {
        let mut markup = QuizMarkup::default();
        markup.region_id = self.region_id.clone();
        match &self.marker_pattern {
            Some(pattern) => markup.with_marker_pattern(pattern),
            None => Ok(markup),
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    var_name: &str,
    value: Option<String>,
    expected_type: &str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: v.clone(),
            expected_type: expected_type.to_string(),
        }),
    }
}

/// 解析逗号分隔的章节列表，如 `3,4, 5`
fn parse_chapters(value: &str) -> Result<Vec<u64>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse().map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: "CHAPTERS".to_string(),
                value: value.to_string(),
                expected_type: "逗号分隔的整数列表".to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.chapters, vec![3, 4, 5, 6, 7]);
        assert_eq!(config.seed_base, 42);
        assert!(!config.dry_run);
        assert_eq!(
            config.document_path(3),
            PathBuf::from("templates/tutorials/rag/chapter3.html")
        );
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("CHAPTERS", " 1, 2 ,10"),
            ("SEED_BASE", "100"),
            ("DRY_RUN", "true"),
            ("RULES_FILE", ""),
            ("REPORT_FILE", "report.json"),
        ]))
        .unwrap();

        assert_eq!(config.chapters, vec![1, 2, 10]);
        assert_eq!(config.seed_base, 100);
        assert!(config.dry_run);
        assert_eq!(config.rules_file, None);
        assert_eq!(config.report_file.as_deref(), Some("report.json"));
    }

    #[test]
    fn test_bad_values_are_errors() {
        let err = Config::from_lookup(lookup_from(&[("SEED_BASE", "forty-two")])).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarParseFailed { ref var_name, .. } if var_name == "SEED_BASE"));

        assert!(Config::from_lookup(lookup_from(&[("CHAPTERS", "3,x")])).is_err());
    }

    #[test]
    fn test_markup_from_config() {
        let mut config = Config::default();
        config.region_id = "questions".to_string();
        assert_eq!(config.markup().unwrap().region_id, "questions");

        config.marker_pattern = Some("no_flag_group".to_string());
        assert!(config.markup().is_err());
    }
}
