//! 题目处理上下文
//!
//! 封装"我正在处理哪份文档的第几题"这一信息，仅用于日志

use std::fmt::Display;

/// 题目处理上下文
#[derive(Debug, Clone)]
pub struct QuestionCtx {
    /// 文档标识（文件名或调用方给出的名字）
    pub document: String,

    /// 题目在文档中的位置（从1开始）
    pub question_index: usize,

    /// 文档中的题目总数
    pub total: usize,
}

impl QuestionCtx {
    /// 创建新的题目上下文
    pub fn new(document: impl Into<String>, question_index: usize, total: usize) -> Self {
        Self {
            document: document.into(),
            question_index,
            total,
        }
    }
}

impl Display for QuestionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[文档 {} 题目 {}/{}]",
            self.document, self.question_index, self.total
        )
    }
}
