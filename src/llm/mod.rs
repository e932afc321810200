//! Chat completion plumbing: provider backends, stream decoding and token budgeting.

pub mod gateway;
pub mod provider;
pub mod router;
pub mod sse;
pub mod tokens;

pub use gateway::CompletionGateway;
pub use provider::{ChatBackend, FragmentStream, HttpChatBackend};
pub use router::Provider;
pub use tokens::{CONTEXT_WINDOW_TOKENS, ENCODER_MODEL, TOKEN_LIMIT, TiktokenCounter, TokenCounter};
