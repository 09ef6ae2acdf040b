// service/executor.rs - Order execution

use std::sync::Arc;
use tracing::info;

use crate::config::TradingConfig;
use crate::exchange::{utils::split_market, Exchange, ExchangeError};
use crate::models::{Decision, TradeAction};

/// Turns an agent decision into at most one market order, subject to the
/// exchange's minimum order notional.
pub struct TradingExecutor {
    exchange: Arc<dyn Exchange>,
    config: TradingConfig,
}

/// Notional to spend on a market buy, or `None` when the post-fee balance
/// does not clear the minimum.
pub fn buy_order_notional(available_quote: f64, fee_factor: f64, min_order: f64) -> Option<f64> {
    let notional = available_quote * fee_factor;
    (notional > min_order).then_some(notional)
}

/// Volume to sell, or `None` when the held value at the best ask does not
/// clear the minimum.
pub fn sell_order_volume(held_volume: f64, best_ask: f64, min_order: f64) -> Option<f64> {
    (held_volume * best_ask > min_order).then_some(held_volume)
}

impl TradingExecutor {
    pub fn new(exchange: Arc<dyn Exchange>, config: TradingConfig) -> Self {
        Self { exchange, config }
    }

    pub async fn execute(&self, decision: &Decision) -> Result<(), ExchangeError> {
        match decision.decision {
            TradeAction::Buy => self.execute_buy(&decision.reason).await,
            TradeAction::Sell => self.execute_sell(&decision.reason).await,
            TradeAction::Hold => {
                info!("hold: {}", decision.reason);
                Ok(())
            }
        }
    }

    async fn execute_buy(&self, reason: &str) -> Result<(), ExchangeError> {
        info!("buy: {}", reason);
        let (quote_currency, _) = split_market(&self.config.ticker)?;
        let available = self.exchange.available_balance(&quote_currency).await?;

        let Some(notional) = buy_order_notional(
            available,
            self.config.buy_fee_factor,
            self.config.min_order_krw,
        ) else {
            info!(
                "buy skipped: {:.0} {} available, below the {:.0} minimum",
                available, quote_currency, self.config.min_order_krw
            );
            return Ok(());
        };

        if self.config.dry_run {
            info!("dry run: would market-buy for {:.0} {}", notional, quote_currency);
            return Ok(());
        }

        let receipt = self.exchange.buy_market_order(notional).await?;
        info!("buy order submitted: {}", receipt.uuid);
        Ok(())
    }

    async fn execute_sell(&self, reason: &str) -> Result<(), ExchangeError> {
        info!("sell: {}", reason);
        let (_, base_currency) = split_market(&self.config.ticker)?;
        let held = self.exchange.available_balance(&base_currency).await?;

        let book = self.exchange.orderbook().await?;
        let best_ask = book
            .orderbook_units
            .first()
            .map(|unit| unit.ask_price)
            .ok_or_else(|| ExchangeError::ApiError("orderbook has no price levels".to_string()))?;

        let Some(volume) = sell_order_volume(held, best_ask, self.config.min_order_krw) else {
            info!(
                "sell skipped: {} {} held, value below the {:.0} minimum",
                held, base_currency, self.config.min_order_krw
            );
            return Ok(());
        };

        if self.config.dry_run {
            info!("dry run: would market-sell {} {}", volume, base_currency);
            return Ok(());
        }

        let receipt = self.exchange.sell_market_order(volume).await?;
        info!("sell order submitted: {}", receipt.uuid);
        Ok(())
    }
}
