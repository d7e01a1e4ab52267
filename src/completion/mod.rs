mod client;
mod prompt;
mod relay;
mod sse_parser;

pub use client::{CompletionClient, TextStream};
pub use prompt::SYSTEM_PROMPT;
pub use relay::{StreamEnd, relay};
pub use sse_parser::{Frame, parse_sse_line, sse_to_text_stream};
