//! Typewriter Core
//!
//! Structure-preserving incremental reveal of HTML markup.
//! Markup is split into reveal units (whole tags, characters or whole text
//! nodes) and appended to an output buffer one unit per tick.
//!
//! # Architecture
//!
//! - **lexer.rs** - SAX-style markup lexer emitting `Event`s
//! - **event.rs** - Lexer events
//! - **tree.rs** - Arena document tree built from events, with validation
//! - **units.rs** - Reveal units and the pre-order extraction walk
//! - **reveal.rs** - Revealer state machine and async timer loop
//! - **html.rs** - Element classes (void, raw text) and name rules
//! - **span.rs** - Byte ranges into the source
//! - **error.rs** - Parse error codes

pub mod error;
pub mod event;
pub mod html;
pub mod lexer;
pub mod reveal;
pub mod span;
pub mod tree;
pub mod units;

pub use error::{ParseError, ParseErrorCode};
pub use event::Event;
pub use lexer::Lexer;
pub use reveal::{RevealState, Revealer, RunOutcome, StringSurface, Surface};
pub use span::Span;
pub use tree::Document;
pub use units::{tokenize, tokenize_bytes, Granularity, RevealSequence, RevealUnit};
