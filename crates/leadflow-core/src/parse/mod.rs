//! Pure parsing functions: language detection, name extraction, phone
//! normalization, and cultural-context inference.
//!
//! Everything here is stateless and deterministic; the classifier and the
//! importer consume these functions directly.

pub mod culture;
pub mod language;
pub mod name;
pub mod phone;

pub use culture::detect_cultural_context;
pub use language::{detect_language, detect_primary_language, DEFAULT_LANGUAGE, SUPPORTED_LANGUAGES};
pub use name::extract_best_name;
pub use phone::{is_valid_phone_number, normalize_phone_number};
