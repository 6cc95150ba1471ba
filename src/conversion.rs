use crate::models::messages::MessagesRequest;
use crate::models::response::{MessagesResponse, Usage};

/// Maximum number of characters of prompt/response text written to the diagnostic log.
pub const LOG_PREVIEW_CHARS: usize = 500;

/// Flatten a Messages request into the single prompt string handed to the generator.
///
/// Mapping rules:
/// - Non-empty `system` text comes first, followed by a blank line.
/// - Each message's `content` follows on its own line, in input order.
/// - Missing `content` still produces an (empty) line.
/// - Roles are not rendered; the generator sees plain text only.
///
/// `system = "S"` with messages `A`, `B` yields `"S\n\nA\nB"`; `system = "S"` with no
/// messages yields `"S\n"`.
pub fn build_prompt(req: &MessagesRequest) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(req.messages().len() + 1);

    if let Some(system) = req.system_text() {
        parts.push(format!("{system}\n"));
    }

    for msg in req.messages() {
        let text = msg
            .content
            .as_ref()
            .map(|c| c.to_text())
            .unwrap_or_default();
        parts.push(text);
    }

    parts.join("\n")
}

/// Whitespace-delimited word count. Stands in for token accounting.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Build the response message for generated `text`, with usage approximated from the
/// prompt and the generated text.
pub fn to_messages_response(prompt: &str, text: String) -> MessagesResponse {
    let usage = Usage {
        input_tokens: word_count(prompt),
        output_tokens: word_count(&text),
    };
    MessagesResponse::from_text(text, usage)
}

/// Shorten text for diagnostic output: at most `LOG_PREVIEW_CHARS` characters, with a
/// trailing `...` when anything was cut.
pub fn truncate_for_log(text: &str) -> String {
    match text.char_indices().nth(LOG_PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
