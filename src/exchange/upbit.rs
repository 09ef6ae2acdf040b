// exchange/upbit.rs - Upbit REST client
//
// All market-data and account I/O for the traded market. Constructed once
// at startup and shared behind `Arc<dyn Exchange>`; holds no mutable state
// beyond the reqwest connection pool.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, error, info};

use super::auth::{authorization_token, encode_query};
use super::errors::ExchangeError;
use super::traits::Exchange;
use super::types::{OrderReceipt, UpbitBalance, UpbitCandle, UpbitOrderbook, UpbitTicker};
use super::utils::{build_investment_status, convert_candles, convert_orderbook, split_market};
use crate::config::{Credentials, TradingConfig};
use crate::models::{Candle, InvestmentStatus, OrderBookSnapshot};

const UPBIT_API_URL: &str = "https://api.upbit.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct UpbitExchange {
    api_url: String,
    market: String,
    base_currency: String,
    quote_currency: String,
    access_key: String,
    secret_key: String,
    client: Client,
}

impl UpbitExchange {
    pub fn new(trading: &TradingConfig, credentials: &Credentials) -> Result<Self, ExchangeError> {
        let (quote_currency, base_currency) = split_market(&trading.ticker)?;
        Ok(Self {
            api_url: UPBIT_API_URL.to_string(),
            market: trading.ticker.clone(),
            base_currency,
            quote_currency,
            access_key: credentials.upbit_access_key.clone(),
            secret_key: credentials.upbit_secret_key.clone(),
            client: Client::new(),
        })
    }

    async fn get_public<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ExchangeError> {
        let url = format!("{}{}", self.api_url, path);
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Signed GET without parameters (the only signed read Upbit needs
    /// here is `/v1/accounts`).
    async fn get_signed<T: DeserializeOwned>(&self, path: &str) -> Result<T, ExchangeError> {
        let url = format!("{}{}", self.api_url, path);
        let token = authorization_token(&self.access_key, &self.secret_key, None)?;
        debug!("GET {} (signed)", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn post_signed<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<T, ExchangeError> {
        let url = format!("{}{}", self.api_url, path);
        let query = encode_query(params);
        let token = authorization_token(&self.access_key, &self.secret_key, Some(&query))?;
        debug!("POST {} {}", url, query);

        let response = self
            .client
            .post(&url)
            .header("Authorization", token)
            .form(params)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ExchangeError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Upbit request failed: HTTP {}: {}", status, body);
            return Err(ExchangeError::ApiError(format!("HTTP {}: {}", status, body)));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn current_price(&self) -> Result<f64, ExchangeError> {
        let tickers: Vec<UpbitTicker> = self
            .get_public("/ticker", &[("markets", self.market.clone())])
            .await?;
        tickers
            .first()
            .map(|t| t.trade_price)
            .ok_or_else(|| ExchangeError::ApiError(format!("empty ticker response for {}", self.market)))
    }

    async fn candles(&self, path: &str, count: u32) -> Result<Vec<Candle>, ExchangeError> {
        let raw: Vec<UpbitCandle> = self
            .get_public(
                path,
                &[("market", self.market.clone()), ("count", count.to_string())],
            )
            .await?;
        Ok(convert_candles(raw))
    }
}

#[async_trait]
impl Exchange for UpbitExchange {
    async fn daily_candles(&self, count: u32) -> Result<Vec<Candle>, ExchangeError> {
        self.candles("/candles/days", count).await
    }

    async fn hourly_candles(&self, count: u32) -> Result<Vec<Candle>, ExchangeError> {
        self.candles("/candles/minutes/60", count).await
    }

    async fn investment_status(&self) -> Result<InvestmentStatus, ExchangeError> {
        let current_price = self.current_price().await?;
        let balances: Vec<UpbitBalance> = self.get_signed("/accounts").await?;
        build_investment_status(
            &balances,
            &self.base_currency,
            &self.quote_currency,
            current_price,
        )
    }

    async fn orderbook(&self) -> Result<OrderBookSnapshot, ExchangeError> {
        let books: Vec<UpbitOrderbook> = self
            .get_public("/orderbook", &[("markets", self.market.clone())])
            .await?;
        let book = books
            .into_iter()
            .next()
            .ok_or_else(|| ExchangeError::ApiError(format!("empty orderbook response for {}", self.market)))?;
        convert_orderbook(book)
    }

    async fn available_balance(&self, currency: &str) -> Result<f64, ExchangeError> {
        let balances: Vec<UpbitBalance> = self.get_signed("/accounts").await?;
        match balances.iter().find(|b| b.currency == currency) {
            Some(entry) => entry.balance.parse::<f64>().map_err(|_| {
                ExchangeError::ParseError(format!(
                    "invalid balance value '{}' for {}",
                    entry.balance, currency
                ))
            }),
            None => Ok(0.0),
        }
    }

    async fn buy_market_order(&self, notional: f64) -> Result<OrderReceipt, ExchangeError> {
        let mut params = BTreeMap::new();
        params.insert("market".to_string(), self.market.clone());
        params.insert("side".to_string(), "bid".to_string());
        params.insert("price".to_string(), notional.to_string());
        params.insert("ord_type".to_string(), "price".to_string());

        let receipt: OrderReceipt = self.post_signed("/orders", &params).await?;
        info!("market buy accepted: {} ({})", receipt.uuid, self.market);
        Ok(receipt)
    }

    async fn sell_market_order(&self, volume: f64) -> Result<OrderReceipt, ExchangeError> {
        let mut params = BTreeMap::new();
        params.insert("market".to_string(), self.market.clone());
        params.insert("side".to_string(), "ask".to_string());
        params.insert("volume".to_string(), volume.to_string());
        params.insert("ord_type".to_string(), "market".to_string());

        let receipt: OrderReceipt = self.post_signed("/orders", &params).await?;
        info!("market sell accepted: {} ({})", receipt.uuid, self.market);
        Ok(receipt)
    }
}
