//! Run transcripts written as JSON lines.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
