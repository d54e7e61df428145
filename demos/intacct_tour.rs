//! Walks through the client against a real company.
//!
//! Set `INTACCT_SENDER_ID`, `INTACCT_SENDER_PASSWORD`, `INTACCT_COMPANY_ID`,
//! `INTACCT_USER_ID` and `INTACCT_USER_PASSWORD`, then run
//! `cargo run --example intacct_tour`.

use anyhow::Result;
use intacct_rs::{Client, Config};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let invalid = config.credentials.with_user(
        config.credentials.company_id.clone(),
        "bad user",
        "bad pass",
    );
    let check = Client::check_credentials(&Config::new(invalid)).await;
    println!("invalid credentials: {}", serde_json::to_string_pretty(&check)?);

    let check = Client::check_credentials(&config).await;
    println!("valid credentials: {}", serde_json::to_string_pretty(&check)?);

    let client = Client::connect(config).await;
    if let Some(error) = client.error() {
        println!("could not open a session: {error}");
        return Ok(());
    }
    println!("session: {}", client.session_id().unwrap_or_default());

    let entities = client.entities().list().await?;
    println!("entities: {}", serde_json::to_string_pretty(&entities)?);

    let departments = client.departments().list().await?;
    println!("departments: {}", serde_json::to_string_pretty(&departments)?);

    for entity in &entities {
        for department in &departments {
            let balances = client
                .trial_balances()
                .get(&department.id, &entity.id)
                .await?;
            let records: Vec<_> = balances.iter().map(intacct_rs::QueryRow::to_record).collect();
            println!(
                "trial balance {}/{}: {}",
                entity.id,
                department.id,
                serde_json::to_string_pretty(&records)?
            );
        }
    }

    Ok(())
}
