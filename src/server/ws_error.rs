/// Centralized helpers for WebSocket error responses.
///
/// Use these helpers to ensure all error messages are consistent, explicit, and include a code and context.

/// Formats a transport-level WebSocket error as a JSON string.
///
/// # Arguments
/// - `code`: Unique error code (e.g. "INVALID_MESSAGE").
/// - `message`: Human-readable error message (in English).
/// - `context`: Optional context (e.g. player_id, room_id).
pub fn ws_error_message(code: &str, message: &str, context: Option<&str>) -> String {
    let context_str = context.unwrap_or("");
    format!(
        r#"{{"action":"Error","data":{{"code":"{}","message":"{}","context":"{}"}}}}"#,
        code, message, context_str
    )
}

/// Formats a `room.error` frame without going through the event enum, for
/// paths where the session has no registry round-trip (parse failures,
/// unregistered senders).
pub fn room_error_message(message: &str) -> String {
    format!(
        r#"{{"action":"room.error","data":{{"message":"{}"}}}}"#,
        message
    )
}
