use crate::error::{AppError, AppResult};
use crate::models::rules::RewriteRules;
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载改写规则
///
/// 文件中未给出的字段使用默认规则；加载后的规则已经过校验。
pub async fn load_rules(toml_file_path: &Path) -> AppResult<RewriteRules> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| AppError::file_read_failed(toml_file_path.display().to_string(), e))?;

    let rules = RewriteRules::from_toml_str(&content)
        .map_err(|e| AppError::toml_parse_failed(toml_file_path.display().to_string(), e))?;

    tracing::info!(
        "已加载改写规则: {} (阈值 short<{} long>={})",
        toml_file_path.display(),
        rules.thresholds().short_max,
        rules.thresholds().long_min
    );

    Ok(rules)
}

/// 配置了规则文件就加载，否则使用默认规则
pub async fn load_rules_or_default(rules_file: Option<&str>) -> AppResult<RewriteRules> {
    match rules_file {
        Some(path) => load_rules(Path::new(path)).await,
        None => {
            tracing::info!("未配置规则文件，使用默认改写规则");
            Ok(RewriteRules::default())
        }
    }
}
