#![forbid(unsafe_code)]
#![doc = r#"
Messages2CLI

Serve a Messages-style chat endpoint locally and answer it with a command-line text generator
(`<program> -p <prompt>`, `claude` by default).

Crate highlights
- Library: pure request flattening via `build_prompt(&MessagesRequest)`.
- HTTP server (in `server`): `GET /health` and `POST /v1/messages`; everything else is 404.
- Generator seam: the `Generator` trait, with `CliGenerator` running the external program under a timeout.

Modules
- `models`: Inbound request and outbound response/error shapes.
- `conversion`: Request -> prompt, generated text -> response, usage approximation.
- `generator`: External program invocation.
- `error`: HTTP-facing error kinds.
- `config`: Bind address, program and timeout from env and flags.
- `server`: Axum router/handlers and the `Server` lifecycle.
- `util`: Shared helpers (tracing, error envelope, shutdown signal).

Note: `usage` counts are whitespace word counts, not tokenizer output.
"#]

pub mod config;
pub mod conversion;
pub mod error;
pub mod generator;
pub mod models;
pub mod server;
pub mod util;

// Re-export the primary conversion function for ergonomic library use.
pub use crate::conversion::build_prompt;

pub use crate::config::ProxyConfig;
pub use crate::error::ProxyError;
pub use crate::generator::{CliGenerator, GenerateError, Generator};
pub use crate::server::{build_router, AppState, Server};

// Re-export model namespaces for convenience (downstream users can do `use messages2cli::messages`).
pub use crate::models::{messages, response};
