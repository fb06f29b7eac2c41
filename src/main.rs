use dotenvy::dotenv;
use point_ledger::{config, errors::Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok();

    // 3. Load the reward policy
    let policy = config::rewards::load_default_policy();
    info!(
        signup_bonus = policy.signup_bonus,
        earn_validity_days = policy.earn_validity_days,
        "loaded reward policy"
    );

    // 4. Initialize the database and ledger schema
    let db = config::database::create_connection().await?;
    config::database::create_tables(&db).await?;
    info!(url = %config::database::get_database_url(), "point ledger ready");

    Ok(())
}
