use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use ethers::{
    providers::{Http, Middleware, Provider},
    types::{transaction::eip2718::TypedTransaction, Address, TransactionRequest, U256},
};
use tracing::{debug, info};

use super::traits::FragmentSource;
use crate::config::ChainConfig;
use crate::core::abi::{decode_uint256_word, no_arg_calldata, u256_ratio_to_f64};
use crate::core::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, INITIAL_SHARES_PER_FRAGMENT_SIG, SHARES_PER_FRAGMENT_SIG,
};
use crate::core::errors::{Result, UtilsError};

/// DIGG token bound to a middleware. Only issues `eth_call`s.
#[derive(Debug, Clone)]
pub struct DiggContract<M> {
    client: Arc<M>,
    address: Address,
}

impl DiggContract<Provider<Http>> {
    /// Builds an HTTP provider for `config.rpc_url`.
    pub fn connect(config: &ChainConfig) -> Result<Self> {
        let rpc_url = config.rpc_url.trim();
        let parsed_url = reqwest::Url::parse(rpc_url).map_err(|e| {
            UtilsError::Config(format!("Invalid RPC URL '{}': {}", rpc_url, e))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| UtilsError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let provider = Provider::new(Http::new_with_client(parsed_url, client));
        Ok(Self::new(Arc::new(provider), config.digg_address))
    }
}

impl<M: Middleware> DiggContract<M> {
    pub fn new(client: Arc<M>, address: Address) -> Self {
        Self { client, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    async fn read_uint(&self, signature: &str) -> Result<U256> {
        let tx: TypedTransaction =
            TransactionRequest::new().to(self.address).data(no_arg_calldata(signature)).into();

        let raw = self.client.call(&tx, None).await.map_err(|e| {
            UtilsError::Contract(format!("{} on {:?}: {}", signature, self.address, e))
        })?;

        let value = decode_uint256_word(&raw)?;
        debug!(%signature, %value, "contract read");
        Ok(value)
    }
}

#[async_trait]
impl<M> FragmentSource for DiggContract<M>
where
    M: Middleware + 'static,
{
    async fn shares_per_fragment(&self) -> Result<U256> {
        self.read_uint(SHARES_PER_FRAGMENT_SIG).await
    }

    async fn initial_shares_per_fragment(&self) -> Result<U256> {
        self.read_uint(INITIAL_SHARES_PER_FRAGMENT_SIG).await
    }
}

/// Converts share amounts into display fragments using ratios cached at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatioConverter {
    shares_per_fragment: U256,
    initial_shares_per_fragment: U256,
}

impl RatioConverter {
    /// Reads both ratios once. Read failures are returned as-is.
    pub async fn from_source<S>(source: &S) -> Result<Self>
    where
        S: FragmentSource + ?Sized,
    {
        let shares_per_fragment = source.shares_per_fragment().await?;
        let initial_shares_per_fragment = source.initial_shares_per_fragment().await?;

        info!(
            %shares_per_fragment,
            %initial_shares_per_fragment,
            "cached DIGG share ratios"
        );

        Ok(Self { shares_per_fragment, initial_shares_per_fragment })
    }

    pub async fn connect(config: &ChainConfig) -> Result<Self> {
        let contract = DiggContract::connect(config)?;
        Self::from_source(&contract).await
    }

    pub fn from_values(shares_per_fragment: U256, initial_shares_per_fragment: U256) -> Self {
        Self { shares_per_fragment, initial_shares_per_fragment }
    }

    pub fn shares_per_fragment(&self) -> U256 {
        self.shares_per_fragment
    }

    pub fn initial_shares_per_fragment(&self) -> U256 {
        self.initial_shares_per_fragment
    }

    /// Zero shares map to zero. Otherwise returns `shares_per_fragment / shares`,
    /// rounded once from the exact integers.
    ///
    /// Note the cached ratio is the dividend. This matches the helper used by the
    /// existing keeper scripts and is kept as-is even though a rebasing conversion
    /// would normally divide `shares` by the ratio.
    pub fn shares_to_fragments(&self, shares: impl Into<U256>) -> f64 {
        u256_ratio_to_f64(self.shares_per_fragment, shares.into()).unwrap_or(0.0)
    }
}
