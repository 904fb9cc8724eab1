//! Greeting handler.

use tracing::instrument;

/// Fixed greeting body served at `/`.
pub const GREETING: &str = "hello";

/// Greeting handler.
///
/// Always answers `200 OK` with a `text/plain` body of `hello`, independent
/// of configuration.
#[instrument(name = "hello.greeting")]
pub async fn hello() -> &'static str {
    GREETING
}
