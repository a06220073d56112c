//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量文档处理器
//! - 管理应用生命周期（初始化、运行）
//! - 按章节逐个读取、变换、写回文档
//! - 派生每份文档的种子
//! - 输出全局统计信息与 JSON 报告
//!
//! ### `document_transformer` - 单个文档处理器
//! - 定位题目区域，收集题目块
//! - 创建并复用 QuestionFlow，整份文档共用一个随机源
//! - 按字节范围拼回结果
//! - 输出单个文档的统计信息
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<Chapter>)
//!     ↓
//! document_transformer (处理 Vec<Question>)
//!     ↓
//! workflow::QuestionFlow (处理单个 Question)
//! ```

pub mod batch_processor;
pub mod document_transformer;

pub use batch_processor::{App, DocumentEntry, DocumentStatus, RunReport, RunStats};
pub use document_transformer::{
    derive_seed, transform_document, DocumentOutcome, DocumentReport, DocumentTransformer,
    SkippedQuestion,
};
