//! 选项打乱服务 - 业务能力层

use crate::models::{LabeledOption, QuizOption};
use rand::seq::SliceRandom;
use rand::Rng;

/// 选项打乱器
///
/// 用 Fisher–Yates 在 24 种排列中均匀抽取一种，再按输出位置分配标签。
/// 正确性标记跟随选项本身移动，从不单独重新分配。
pub struct Shuffler<'l> {
    labels: &'l [String],
}

impl<'l> Shuffler<'l> {
    pub fn new(labels: &'l [String]) -> Self {
        Self { labels }
    }

    pub fn shuffle<R: Rng + ?Sized>(
        &self,
        mut options: Vec<QuizOption>,
        rng: &mut R,
    ) -> Vec<LabeledOption> {
        options.shuffle(rng);
        options
            .into_iter()
            .zip(self.labels.iter())
            .map(|(option, label)| LabeledOption {
                label: label.clone(),
                option,
            })
            .collect()
    }
}
