mod local;
mod source;

pub use local::LocalFileSource;
pub use source::{content_type_for, FileSource, DEFAULT_CONTENT_TYPE};
