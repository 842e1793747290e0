//! Answer source adapters
//!
//! - [`CommandSource`]: runs an external program per call (JSON over stdin)
//! - [`TimeoutSource`]: per-call deadline around any source
//! - [`SourceRegistry`]: builds both from `[sources.<name>]` entries

mod command;
mod registry;
mod timeout;

pub use command::{CommandSource, CommandSourceError};
pub use registry::SourceRegistry;
pub use timeout::TimeoutSource;
