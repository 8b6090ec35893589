pub mod document;
pub mod errors;
pub mod html;
pub mod scanner;
pub mod substitute;

// Re-export commonly used items
pub use document::{DocumentMode, replace_in_document};
pub use errors::EncodeError;
pub use substitute::{
    ScriptEncoding, encode_script_text, encode_script_text_with_prefixes, replace_all,
    replace_all_strict,
};
