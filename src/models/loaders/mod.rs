pub mod toml_loader;

pub use toml_loader::{load_rules, load_rules_or_default};
