//! # Quiz Rebalance
//!
//! 重建教程页面中的单选测验：打乱选项顺序、规整错误选项长度，
//! 使正确答案既不总在同一位置，也不再是"最长的那个"。
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 只认识标记，不认识业务
//! - `MarkupTree` - 按深度配对开闭标签的元素扫描
//! - `QuizMarkup` - 测验标记方言（区域、题目、选项、正确性标记）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单道题
//! - `extract_question` - 提取标题与四个选项
//! - `LengthNormalizer` - 错误选项分档改写
//! - `Shuffler` - 均匀打乱并重新编号
//! - `serialize_question` - 放回原外壳
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一道题"的完整处理流程
//! - `QuestionCtx` - 上下文封装（文档 + 题目序号）
//! - `QuestionFlow` - 流程编排（extract → normalize → shuffle → serialize）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 按章节批量读写文档
//! - `orchestrator/document_transformer` - 单个文档处理器，遍历题目列表
//!
//! ## 示例
//!
//! ```
//! let page = "<p>no quiz here</p>";
//! assert_eq!(quiz_rebalance::transform_document(page, 7), page);
//! ```

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, SkipReason};
pub use infrastructure::{MarkupTree, QuizMarkup};
pub use models::{LengthTier, QuizOption, RewriteRules, TierThresholds};
pub use orchestrator::{
    derive_seed, transform_document, App, DocumentOutcome, DocumentReport, DocumentTransformer,
    RunReport,
};
pub use workflow::{ProcessResult, QuestionCtx, QuestionFlow};
