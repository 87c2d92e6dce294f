//! Reading, editing and writing subtitles in SRT, WebVTT and plain text.
//!
//! ```
//! use subvert::{parse, to_string, Editor, Endpoint, Format};
//!
//! let mut doc = parse("1\n00:00:01,000 --> 00:00:02,000\nHello\n", Format::Srt);
//! let editor = Editor::new();
//! editor.append(&mut doc, "World");
//! editor.set_time(&mut doc, 0, Endpoint::End, 0.5).unwrap();
//!
//! assert_eq!(doc.captions()[0].start, 0.0);
//! assert!(to_string(&doc, Format::WebVtt).starts_with("WEBVTT"));
//! ```

pub mod caption;
pub mod config;
pub mod editor;
pub mod error;
pub mod format;
pub mod parser;
pub mod serialiser;
pub mod timestamp;

pub use crate::caption::{Caption, Document};
pub use crate::config::{EditPolicy, PlainTiming};
pub use crate::editor::{Editor, Endpoint};
pub use crate::error::{ConfigError, EditError, EngineError};
pub use crate::format::Format;
pub use crate::parser::{parse, Parser};
pub use crate::serialiser::{preview, serialise, to_string};
pub use crate::timestamp::{Clock, MAX_SECONDS};
