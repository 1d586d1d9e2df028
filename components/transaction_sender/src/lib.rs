use anyhow::anyhow;
use common::types::{ReceiptStatus, TransferOutcome};
use ethers::prelude::*;
use ethers::signers::LocalWallet;
use std::convert::TryFrom;

pub type DeployerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Binds the wallet to whatever chain the endpoint reports so signatures carry the right EIP-155 id.
pub async fn connect(rpc_url: &str, wallet: LocalWallet) -> anyhow::Result<DeployerClient> {
    let provider = Provider::<Http>::try_from(rpc_url)
        .map_err(|e| anyhow!("Invalid RPC URL {}: {}", rpc_url, e))?;

    let chain_id = provider
        .get_chainid()
        .await
        .map_err(|e| anyhow!("Failed to reach RPC endpoint {}: {}", rpc_url, e))?;
    log::info!("Connected to {} (chain id {})", rpc_url, chain_id);

    let wallet = wallet.with_chain_id(chain_id.as_u64());

    Ok(SignerMiddleware::new(provider, wallet))
}

pub async fn deployer_balance(client: &DeployerClient) -> anyhow::Result<U256> {
    client
        .get_balance(client.address(), None)
        .await
        .map_err(|e| anyhow!("Failed to fetch deployer balance: {}", e))
}

/// Broadcasts a plain value transfer. The returned handle resolves once it is mined.
pub async fn send_eth_transfer(
    client: &DeployerClient,
    to_address: Address,
    value: U256,
) -> anyhow::Result<PendingTransaction<'_, Http>> {
    let tx = TransactionRequest::new()
        .from(client.address())
        .to(to_address)
        .value(value);

    let pending = client
        .send_transaction(tx, None)
        .await
        .map_err(|e| anyhow!("Transaction failed: {}", e))?;
    log::info!("Broadcast {:#x}", pending.tx_hash());

    Ok(pending)
}

pub async fn wait_for_receipt<P: JsonRpcClient>(
    pending: PendingTransaction<'_, P>,
) -> anyhow::Result<TransferOutcome> {
    let tx_hash = pending.tx_hash();

    let receipt = pending
        .await
        .map_err(|e| anyhow!("Transaction failed: {}", e))?;
    log::debug!("Receipt for {:#x}: {:?}", tx_hash, receipt);

    Ok(TransferOutcome {
        tx_hash,
        status: ReceiptStatus::from_receipt(receipt.as_ref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn throwaway_wallet() -> LocalWallet {
        LocalWallet::new(&mut rand::thread_rng())
    }

    #[tokio::test]
    async fn rejects_unparseable_rpc_url() {
        let err = connect("not a url", throwaway_wallet()).await.unwrap_err();

        assert!(err.to_string().starts_with("Invalid RPC URL not a url"));
    }

    #[tokio::test]
    async fn reports_unreachable_endpoint() {
        // nothing listens on port 1
        let err = connect("http://127.0.0.1:1", throwaway_wallet())
            .await
            .unwrap_err();

        assert!(err
            .to_string()
            .starts_with("Failed to reach RPC endpoint http://127.0.0.1:1"));
    }

    #[tokio::test]
    async fn dropped_transaction_has_no_receipt() -> anyhow::Result<()> {
        let (provider, mock) = Provider::mocked();
        let provider = provider.interval(std::time::Duration::from_millis(10));
        // eth_getTransactionByHash answers null once the node forgets the transaction
        mock.push::<serde_json::Value, _>(serde_json::Value::Null)?;

        let pending = PendingTransaction::new(TxHash::repeat_byte(0x11), &provider);
        let outcome = wait_for_receipt(pending).await?;

        assert_eq!(outcome.tx_hash, TxHash::repeat_byte(0x11));
        assert_eq!(outcome.status, ReceiptStatus::Missing);

        Ok(())
    }

    // needs a funded deployer in ./.env plus DEPLOYER_PASSWORD, run with --ignored
    #[tokio::test]
    #[ignore]
    async fn it_makes_testnet_eth_transfers() -> anyhow::Result<()> {
        let config = config::Config::new_from_env()?;
        let password = std::env::var("DEPLOYER_PASSWORD")?;
        let wallet =
            common::keystore::decrypt_deployer_wallet(&config.deployer_private_key_encrypted, &password)?;

        let client = connect(&config.default_rpc_url, wallet).await?;
        let pending = send_eth_transfer(
            &client,
            "0xBeafFE58538eAfe49d1E4455500BC659f5D37433".parse()?,
            U256::from(1000000000000000_u64),
        )
        .await?;
        let outcome = wait_for_receipt(pending).await?;

        assert_eq!(outcome.status, ReceiptStatus::Success);

        Ok(())
    }
}
