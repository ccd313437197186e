//! Example: Print stablecoin system state for an account.
//!
//! Run with: NODE_URL=https://nodes.get-scatter.com ACCOUNT=youraccount \
//!     cargo run --example print_positions

use cdp_sdk::{Network, contracts::PositionsClient, node::HttpNode};

#[derive(Debug, serde::Deserialize)]
struct Env {
    node_url: String,
    account: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let env: Env = envy::from_env()?;

    let node = HttpNode::new(&env.node_url)?;
    let network = Network::mainnet();
    let client = PositionsClient::eos(node, &network);

    let parameters = client.parameters().await?;
    println!("total collateral: {}", parameters.total_collateral);
    println!("total debt:       {}", parameters.total_debt);

    println!("\nOracle rates:");
    for rate in client.rates().await? {
        println!("  {} (updated {})", rate.rate, rate.update);
    }

    let positions = client.positions_by_maker(&env.account).await?;
    println!("\n{} position(s) for {}:", positions.len(), env.account);
    for position in &positions {
        println!(
            "  #{}: {} collateral, {} debt",
            position.position_id, position.collateral, position.outstanding
        );
    }

    let balance = client.stable_balance(&env.account).await?;
    println!("\nEOSDT balance: {balance}");

    Ok(())
}
