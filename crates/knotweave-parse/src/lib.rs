//! Script parser for knotweave stories.
//!
//! Turns the line-oriented authoring format into the unit model of
//! [`knotweave_core`]. The format has three kinds of lines:
//!
//! - **Header** (before the first unit): `// KEY: value`. `STATES`,
//!   `FLAG-STATES` and `LOCAL-STATES` declare variables; anything else is
//!   passed through as metadata.
//! - **Unit headers:** `=== name ===`.
//! - **Unit body:** text (optionally `- {condition} text`), choices
//!   (`* {condition} label ~ name = bool -> target`), `// scene: label`,
//!   and `END`.

pub mod error;
pub mod line;
pub mod parser;

pub use error::ParseError;
pub use parser::parse_script;
