//! Form intake subsystem.
//!
//! # Data Flow
//! ```text
//! POST body + Content-Type
//!     → parser.rs (JSON / form-encoded / multipart → RawForm)
//!     → validate.rs (presence, email format, length bounds)
//!     → Submission record built by the pipeline
//! ```

pub mod parser;
pub mod validate;

pub use parser::{parse_submission, ParseError, RawForm};
pub use validate::{validate_fields, FieldBounds};
