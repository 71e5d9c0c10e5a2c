pub mod error;
pub mod gemini;
pub mod retry;
pub mod traits;
pub mod util;

pub use error::AiError;
pub use gemini::Gemini;
pub use retry::{RetryPolicy, Retrying};
pub use traits::{ChatModel, GenerateRequest, Message, MessageRole};
pub use util::truncate_to_char_boundary;
