pub mod extractor;
pub mod normalizer;
pub mod serializer;
pub mod shuffler;

pub use extractor::{extract_question, OPTION_COUNT};
pub use normalizer::LengthNormalizer;
pub use serializer::serialize_question;
pub use shuffler::Shuffler;
