/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Sign-up, sign-in and account deletion
/// - `tasks`: Task CRUD and readiness toggle
/// - `categories`: Category create, delete and list

pub mod auth;
pub mod categories;
pub mod health;
pub mod tasks;
