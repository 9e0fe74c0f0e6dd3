/// Middleware for the API server
///
/// - `auth`: bearer-token authentication gate and the `AuthUser` extractor
/// - `ownership`: task and category ownership gates
/// - `deadline`: per-request deadline
/// - `security`: security response headers

pub mod auth;
pub mod deadline;
pub mod ownership;
pub mod security;
