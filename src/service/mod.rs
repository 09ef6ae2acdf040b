// service/mod.rs

pub mod analysis;
pub mod executor;

pub use analysis::{AnalysisService, DAILY_CANDLE_COUNT, HOURLY_CANDLE_COUNT};
pub use executor::TradingExecutor;
