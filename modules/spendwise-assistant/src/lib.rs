pub mod dates;
pub mod error;
pub mod extract;
pub mod prompts;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod voice;

pub use dates::{resolve_relative_dates, Clock, DateContext, FixedClock, SystemClock};
pub use error::AssistantError;
pub use extract::{extract_json_object, parse_category_draft, parse_transaction_draft, ExtractError};
pub use session::ChatSessions;
pub use voice::VoiceExtractor;
