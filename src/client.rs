use std::time::Duration;

use deploy_v3_migration::{
    Deployment, MigrationError, Result, TransactionClient, CONFIRMATION_TIMEOUT,
};
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{
        transaction::eip2718::TypedTransaction, Address, Bytes, TransactionReceipt,
        TransactionRequest, TxHash, U256, U64,
    },
};
use reqwest::Url;
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_secs(4);

/// Signs with a local key and talks to one node over HTTP JSON-RPC
pub struct EthersClient {
    signer: SignerMiddleware<Provider<Http>, LocalWallet>,
    gas_price: Option<U256>,
    poll_interval: Duration,
}

impl EthersClient {
    pub async fn connect(url: Url, private_key: &str, gas_price: Option<U256>) -> eyre::Result<Self> {
        let provider = Provider::new(Http::new(url)).interval(POLL_INTERVAL);
        let chain_id = provider.get_chainid().await?;
        let wallet = private_key
            .parse::<LocalWallet>()?
            .with_chain_id(chain_id.as_u64());
        info!(chain_id = %chain_id, signer = ?wallet.address(), "connected");
        Ok(Self {
            signer: SignerMiddleware::new(provider, wallet),
            gas_price,
            poll_interval: POLL_INTERVAL,
        })
    }

    fn provider(&self) -> &Provider<Http> {
        self.signer.inner()
    }

    async fn broadcast(&self, to: Option<Address>, data: Bytes) -> Result<TxHash> {
        let mut request = TransactionRequest::new().from(self.signer_address()).data(data);
        if let Some(to) = to {
            request = request.to(to);
        }
        if let Some(gas_price) = self.gas_price {
            request = request.gas_price(gas_price);
        }
        let transaction: TypedTransaction = request.into();
        let pending = self
            .signer
            .send_transaction(transaction, None)
            .await
            .map_err(|e| MigrationError::TransactionRejected(e.to_string()))?;
        let hash = pending.tx_hash();
        info!(?hash, "transaction sent");
        Ok(hash)
    }

    // Polls until the receipt exists and its block is `confirmations` deep
    async fn wait_for_receipt(&self, hash: TxHash, confirmations: u64) -> Result<TransactionReceipt> {
        loop {
            let receipt = self
                .provider()
                .get_transaction_receipt(hash)
                .await
                .map_err(MigrationError::rpc)?;
            if let Some(receipt) = receipt {
                if receipt.status == Some(U64::zero()) {
                    return Err(MigrationError::TransactionRejected(format!(
                        "transaction {hash:?} reverted"
                    )));
                }
                if let Some(mined) = receipt.block_number {
                    let head = self
                        .provider()
                        .get_block_number()
                        .await
                        .map_err(MigrationError::rpc)?;
                    let depth = head.as_u64().saturating_sub(mined.as_u64()) + 1;
                    debug!(?hash, depth, confirmations, "receipt found");
                    if depth >= confirmations {
                        return Ok(receipt);
                    }
                }
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait::async_trait]
impl TransactionClient for EthersClient {
    fn signer_address(&self) -> Address {
        self.signer.address()
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let request: TypedTransaction = TransactionRequest::new().to(to).data(data).into();
        self.provider()
            .call(&request, None)
            .await
            .map_err(MigrationError::rpc)
    }

    async fn send(&self, to: Address, data: Bytes) -> Result<TxHash> {
        self.broadcast(Some(to), data).await
    }

    async fn deploy(&self, contract: &str, creation_code: Bytes) -> Result<Deployment> {
        let hash = self.broadcast(None, creation_code).await?;
        let receipt = tokio::time::timeout(CONFIRMATION_TIMEOUT, self.wait_for_receipt(hash, 1))
            .await
            .map_err(|_| MigrationError::ConfirmationTimeout {
                hash,
                confirmations: 1,
                timeout: CONFIRMATION_TIMEOUT,
            })??;
        let address = receipt.contract_address.ok_or_else(|| {
            MigrationError::TransactionRejected(format!("{contract} creation {hash:?} has no contract address"))
        })?;
        info!(contract, ?address, ?hash, "contract deployed");
        Ok(Deployment { address, hash })
    }

    async fn wait_for_confirmations(&self, hash: TxHash, confirmations: u64) -> Result<()> {
        self.wait_for_receipt(hash, confirmations).await.map(|_| ())
    }
}
