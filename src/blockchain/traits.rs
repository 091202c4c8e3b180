use async_trait::async_trait;
use ethers::types::U256;

use crate::core::errors::Result;

/// Read-only accessors exposed by a shares-per-fragment rebasing token.
#[async_trait]
pub trait FragmentSource: Send + Sync {
    /// Current `_sharesPerFragment` value.
    async fn shares_per_fragment(&self) -> Result<U256>;

    /// `_initialSharesPerFragment` fixed at deployment.
    async fn initial_shares_per_fragment(&self) -> Result<U256>;
}
