//! Wire models for the Messages-style endpoint.
//!
//! - `messages`: the inbound request (`system` plus ordered `messages`).
//! - `response`: the outbound message, usage accounting and the error envelope.
//!
//! Turning a request into a prompt and generated text into a response lives in
//! `crate::conversion`.

pub mod messages;
pub mod response;

pub use messages::{ContentBlock, InboundMessage, MessageContent, MessagesRequest};
pub use response::{ErrorBody, ErrorDetail, MessagesResponse, ResponseBlock, Usage, MODEL_ID};
