//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责按章节批量处理文档。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：加载改写规则、构造标记方言
//! 2. **逐章处理**：按配置的章节顺序依次读取、变换、写回
//! 3. **种子约定**：章节 n 使用 `seed_base + n`
//! 4. **容错**：文件不存在时警告并跳过；单个文件读写失败不影响其他章节
//! 5. **全局统计**：汇总结果，可选输出 JSON 报告
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单道题的细节
//! - **顺序执行**：文档之间没有共享状态，逐个处理
//! - **向下委托**：委托 `DocumentTransformer` 处理单个文档

use crate::config::Config;
use crate::error::{AppError, AppResult, FileError};
use crate::models::load_rules_or_default;
use crate::orchestrator::document_transformer::{derive_seed, DocumentReport, DocumentTransformer};
use crate::utils::logging;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    transformer: DocumentTransformer,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::log_startup(&config);

        if !fs::try_exists(&config.documents_dir).await.unwrap_or(false) {
            return Err(AppError::File(FileError::DirectoryNotFound {
                path: config.documents_dir.clone(),
            })
            .into());
        }

        let rules = load_rules_or_default(config.rules_file.as_deref())
            .await
            .context("加载改写规则失败")?;
        let markup = config
            .markup()
            .map_err(AppError::Config)
            .context("构造标记方言失败")?;

        Ok(Self {
            config,
            transformer: DocumentTransformer::new(rules, markup),
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunReport> {
        let mut report = RunReport {
            started_at: chrono::Local::now().to_rfc3339(),
            finished_at: String::new(),
            seed_base: self.config.seed_base,
            dry_run: self.config.dry_run,
            documents: Vec::with_capacity(self.config.chapters.len()),
        };

        let total = self.config.chapters.len();
        for (index, &chapter) in self.config.chapters.iter().enumerate() {
            let path = self.config.document_path(chapter);
            let seed = derive_seed(self.config.seed_base, chapter);
            logging::log_document_start(index + 1, total, &path.display().to_string(), seed);

            let status = match self.process_document(&path, chapter, seed).await {
                Ok(status) => status,
                Err(e) => {
                    error!("[文档 {}] ❌ 处理失败: {}", chapter, e);
                    DocumentStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };

            report.documents.push(DocumentEntry {
                chapter,
                path: path.display().to_string(),
                seed,
                status,
            });
        }

        report.finished_at = chrono::Local::now().to_rfc3339();
        let stats = report.stats();
        logging::print_final_stats(
            stats.processed,
            stats.missing,
            stats.failed,
            stats.questions_transformed,
        );

        if let Some(report_file) = &self.config.report_file {
            write_report(Path::new(report_file), &report)
                .await
                .with_context(|| format!("写入报告失败: {}", report_file))?;
            info!("\n报告已保存至: {}", report_file);
        }

        Ok(report)
    }

    /// 处理单个文档
    ///
    /// # 参数
    /// - `path`: 文档路径
    /// - `chapter`: 章节编号（用于日志）
    /// - `seed`: 本文档的种子
    ///
    /// # 返回
    /// 文件不存在返回 `Missing`；读写失败返回错误
    async fn process_document(
        &self,
        path: &Path,
        chapter: u64,
        seed: u64,
    ) -> AppResult<DocumentStatus> {
        let shown = path.display().to_string();

        if !fs::try_exists(path).await.unwrap_or(false) {
            warn!("[文档 {}] ⚠️ 文件不存在，跳过: {}", chapter, shown);
            return Ok(DocumentStatus::Missing);
        }

        let raw = fs::read_to_string(path)
            .await
            .map_err(|e| AppError::file_read_failed(&shown, e))?;

        let outcome = self
            .transformer
            .transform_as(&chapter.to_string(), &raw, seed);
        let report = outcome.report;

        if !report.region_found {
            warn!("[文档 {}] ⚠️ 未找到题目区域，保持原样", chapter);
        }
        info!(
            "[文档 {}] 找到 {} 道题, 重建 {} 道, 跳过 {} 道, 改写选项 {} 个",
            chapter,
            report.questions_found,
            report.transformed,
            report.skipped.len(),
            report.rewritten_options
        );

        let changed = outcome.text != raw;
        if self.config.dry_run {
            info!("[文档 {}] 💡 试运行，未写回", chapter);
        } else if changed {
            fs::write(path, &outcome.text)
                .await
                .map_err(|e| AppError::file_write_failed(&shown, e))?;
            info!("[文档 {}] ✓ 已写回", chapter);
        }

        Ok(DocumentStatus::Processed { changed, report })
    }
}

/// 把运行报告写成 JSON
async fn write_report(path: &Path, report: &RunReport) -> AppResult<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))
}

/// 整次运行的报告
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: String,
    pub finished_at: String,
    pub seed_base: u64,
    pub dry_run: bool,
    pub documents: Vec<DocumentEntry>,
}

impl RunReport {
    pub fn stats(&self) -> RunStats {
        let mut stats = RunStats::default();
        for entry in &self.documents {
            match &entry.status {
                DocumentStatus::Processed { report, .. } => {
                    stats.processed += 1;
                    stats.questions_transformed += report.transformed;
                    stats.questions_skipped += report.skipped.len();
                }
                DocumentStatus::Missing => stats.missing += 1,
                DocumentStatus::Failed { .. } => stats.failed += 1,
            }
        }
        stats
    }
}

/// 单个文档的处理记录
#[derive(Debug, Clone, Serialize)]
pub struct DocumentEntry {
    pub chapter: u64,
    pub path: String,
    pub seed: u64,
    #[serde(flatten)]
    pub status: DocumentStatus,
}

/// 单个文档的处理状态
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    Processed {
        /// 输出是否与原文不同
        changed: bool,
        report: DocumentReport,
    },
    Missing,
    Failed {
        error: String,
    },
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub processed: usize,
    pub missing: usize,
    pub failed: usize,
    pub questions_transformed: usize,
    pub questions_skipped: usize,
}
