//! Shared fatal-error reporting
//!
//! Errors that a user can fix (a missing unit directory, a bad config value)
//! are reported with their own message. Everything else is reported with the
//! operation that failed, and the full error goes to the debug log.

/// Errors that know whether their message is meant for the user
///
/// When `is_user_actionable()` is true, `user_message()` must return `Some`.
pub trait ContextualError: std::error::Error {
    /// True when the message names something the user can change
    fn is_user_actionable(&self) -> bool;

    /// Message shown to the user for actionable errors, `None` otherwise
    fn user_message(&self) -> Option<&str>;
}

/// Log a fatal error at `error` level with details at `debug` level
///
/// ```rust,no_run
/// # use dynimport::core::error_handling::log_error_with_context;
/// # use dynimport::importer::api::register;
/// if let Err(e) = register(std::path::Path::new("./modules")) {
///     log_error_with_context(&e, "Component discovery");
/// }
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    let headline = fatal_headline(error, operation_context);
    log::error!("FATAL: {}", headline);
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

/// The line a user sees for `error`: its own message when actionable, else the context
pub fn fatal_headline<E: ContextualError>(error: &E, operation_context: &str) -> String {
    match error.user_message() {
        Some(message) if error.is_user_actionable() => format!("{}: {}", message, error),
        _ => format!("{} failed: {}", operation_context, error),
    }
}
