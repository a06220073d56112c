//! 日志工具模块
//!
//! 提供日志初始化和格式化输出的辅助函数

use crate::config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// 优先使用 `RUST_LOG`，未设置时按 `verbose` 选择 `debug` 或 `info`。
/// 重复初始化不会报错（测试中会多次调用）。
///
/// # 参数
/// - `verbose`: 是否显示详细日志
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 程序配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📁 文档目录: {}", config.documents_dir);
    info!("📋 章节: {:?}", config.chapters);
    info!("🎲 种子基数: {}", config.seed_base);
    if config.dry_run {
        info!("💡 试运行模式：只处理不写回");
    }
    info!("{}", "=".repeat(60));
}

/// 记录单个文档开始处理
///
/// # 参数
/// - `index`: 当前文档序号（从1开始）
/// - `total`: 文档总数
/// - `path`: 文档路径
/// - `seed`: 本文档的种子
pub fn log_document_start(index: usize, total: usize, path: &str, seed: u64) {
    info!("\n{}", "─".repeat(60));
    info!("📄 [{}/{}] {} (seed={})", index, total, path, seed);
}

/// 打印最终统计信息
///
/// # 参数
/// - `processed`: 已处理文档数
/// - `missing`: 不存在而跳过的文档数
/// - `failed`: 读写失败的文档数
/// - `questions`: 重建的题目总数
pub fn print_final_stats(processed: usize, missing: usize, failed: usize, questions: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 已处理文档: {}", processed);
    info!("📝 重建题目: {}", questions);
    info!("⏭️ 文件不存在: {}", missing);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
