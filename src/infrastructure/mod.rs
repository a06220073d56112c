//! 基础设施层：只认识标记，不认识"题目该怎么改"

pub mod markup_scanner;
pub mod quiz_markup;

pub use markup_scanner::{Element, MarkupTree};
pub use quiz_markup::{OptionLabels, QuizMarkup, LABEL_DELIMITERS};
