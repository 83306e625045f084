use ethers::types::{Address, Bytes, TxHash};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub address: Address,
    pub hash: TxHash,
}

/// Signs, broadcasts and tracks transactions on behalf of the configured signer
#[async_trait::async_trait]
pub trait TransactionClient: Send + Sync {
    fn signer_address(&self) -> Address;

    /// Read-only contract call against the latest block
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes>;

    /// Broadcast a contract call, returning as soon as the node accepts it
    async fn send(&self, to: Address, data: Bytes) -> Result<TxHash>;

    /// Broadcast a contract creation and wait until it is included with a successful status
    async fn deploy(&self, contract: &str, creation_code: Bytes) -> Result<Deployment>;

    /// Resolves once `hash` is buried under `confirmations` blocks, the caller bounds the wait
    async fn wait_for_confirmations(&self, hash: TxHash, confirmations: u64) -> Result<()>;
}
