pub mod loaders;
pub mod option;
pub mod question;
pub mod rules;

pub use loaders::{load_rules, load_rules_or_default};
pub use option::{LabeledOption, LengthTier, OptionShell, QuizOption, TierThresholds};
pub use question::{ParsedQuestion, QuestionLayout};
pub use rules::{RawRewriteRules, RewriteRules, TierBank, ANSWER_PLACEHOLDER};
