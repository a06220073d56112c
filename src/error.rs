use serde::Serialize;
use std::fmt;

/// 应用程序错误类型
///
/// 只在驱动层（读写文件、加载配置）出现；核心变换流程从不返回错误，
/// 无法安全处理的题目以 [`SkipReason`] 记录后原样保留。
#[derive(Debug)]
pub enum AppError {
    /// 文件操作错误
    File(FileError),
    /// 配置错误
    Config(ConfigError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::File(e) => write!(f, "文件错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::File(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 文件操作错误
#[derive(Debug)]
pub enum FileError {
    /// 读取文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// TOML 解析失败
    TomlParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 目录不存在
    DirectoryNotFound { path: String },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path, source)
            }
            FileError::WriteFailed { path, source } => {
                write!(f, "写入文件失败 ({}): {}", path, source)
            }
            FileError::TomlParseFailed { path, source } => {
                write!(f, "TOML解析失败 ({}): {}", path, source)
            }
            FileError::DirectoryNotFound { path } => write!(f, "目录不存在: {}", path),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. }
            | FileError::WriteFailed { source, .. }
            | FileError::TomlParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            FileError::DirectoryNotFound { .. } => None,
        }
    }
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 环境变量解析失败
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 标记方言中的正则无效
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EnvVarParseFailed {
                var_name,
                value,
                expected_type,
            } => {
                write!(
                    f,
                    "环境变量 {} 解析失败: 值 '{}' 无法转换为 {}",
                    var_name, value, expected_type
                )
            }
            ConfigError::InvalidPattern { pattern, source } => {
                write!(f, "正则表达式无效 '{}': {}", pattern, source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPattern { source, .. } => Some(source),
            ConfigError::EnvVarParseFailed { .. } => None,
        }
    }
}

/// 改写规则校验错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// 长度阈值不满足 0 < short_max < long_min
    InvalidThresholds { short_max: usize, long_min: usize },
    /// 标签数量不是 4
    LabelCount { found: usize },
    /// 标签为空、含空白或标记字符，或与其他标签重复
    InvalidLabel { label: String },
    /// 某一档没有兜底短语
    EmptyFallbacks { tier: String },
    /// 兜底短语的长度不在所属档位内
    FallbackOutOfTier { tier: String, phrase: String },
    /// 模板缺少 `{answer}` 占位符
    MissingPlaceholder { tier: String, template: String },
    /// 模板或短语中含有标记字符
    MarkupInText { text: String },
}

impl fmt::Display for RulesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RulesError::InvalidThresholds {
                short_max,
                long_min,
            } => write!(
                f,
                "长度阈值无效: short_max={} long_min={}，需要 0 < short_max < long_min",
                short_max, long_min
            ),
            RulesError::LabelCount { found } => {
                write!(f, "选项标签需要 4 个，实际 {} 个", found)
            }
            RulesError::InvalidLabel { label } => {
                write!(f, "选项标签无效: '{}'（不能为空、含空白或标记字符，且不能重复）", label)
            }
            RulesError::EmptyFallbacks { tier } => write!(f, "{} 档缺少兜底短语", tier),
            RulesError::FallbackOutOfTier { tier, phrase } => {
                write!(f, "兜底短语长度不属于 {} 档: {}", tier, phrase)
            }
            RulesError::MissingPlaceholder { tier, template } => {
                write!(f, "{} 档模板缺少 {{answer}} 占位符: {}", tier, template)
            }
            RulesError::MarkupInText { text } => {
                write!(f, "模板中不允许出现 '<' 或 '&': {}", text)
            }
        }
    }
}

impl std::error::Error for RulesError {}

/// 题目被原样保留的原因
///
/// 不是失败：文档变换遇到这些情况时保留原始字节并继续处理下一题。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// 题目元素缺少标题
    #[error("题目缺少标题元素")]
    MissingHeader,
    /// 选项数量不是 4
    #[error("选项数量为 {found}，需要恰好 4 个")]
    OptionCountMismatch { found: usize },
    /// 正确选项数量不是 1
    #[error("正确选项数量为 {found}，需要恰好 1 个")]
    CorrectCountMismatch { found: usize },
    /// 某个选项结构异常（缺少正确性标记、内含子标签等）
    #[error("第 {index} 个选项结构异常: {detail}")]
    MalformedOption { index: usize, detail: &'static str },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Other(err.to_string())
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建 TOML 解析错误（带路径）
    pub fn toml_parse_failed(path: impl Into<String>, source: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
