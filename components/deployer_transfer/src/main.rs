mod prompt;

use common::{
    keystore::decrypt_deployer_wallet,
    types::ReceiptStatus,
    utils::ensure_sufficient_balance,
};
use config::Config;
use ethers::utils::{format_ether, to_checksum};
use std::io;
use transaction_sender::{connect, deployer_balance, send_eth_transfer, wait_for_receipt};

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    if let Err(e) = run().await {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::new_from_env()?;

    let password = prompt::password("Enter password to decrypt deployer private key:")?;
    let wallet = decrypt_deployer_wallet(&config.deployer_private_key_encrypted, &password)?;

    let request = {
        let mut reader = io::stdin().lock();
        let mut writer = io::stdout();
        prompt::collect_transfer_request(&mut reader, &mut writer, &config.default_rpc_url)?
    };
    log::debug!("Transfer request: {:?}", request);

    let client = connect(&request.rpc_url, wallet).await?;

    let balance = deployer_balance(&client).await?;
    println!("Deployer address: {}", to_checksum(&client.address(), None));
    println!("Deployer balance: {} ETH", format_ether(balance));
    ensure_sufficient_balance(balance, request.amount)?;

    let pending = send_eth_transfer(&client, request.to, request.amount).await?;
    println!("⏳ Sending transaction...");
    let outcome = wait_for_receipt(pending).await?;

    match outcome.status {
        ReceiptStatus::Missing => println!("{}", outcome),
        _ => println!("✅ {}", outcome),
    }

    Ok(())
}
