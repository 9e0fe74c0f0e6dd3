/// Database layer for Plan&Do
///
/// Connection pooling with startup retry and the embedded migration runner.
/// Models live in the `models` module at crate root level.
///
/// # Example
///
/// ```no_run
/// use plando_shared::db::pool::{connect_with_retry, DatabaseConfig, RetryPolicy};
/// use plando_shared::db::migrations::run_migrations;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = connect_with_retry(config, RetryPolicy::default()).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
