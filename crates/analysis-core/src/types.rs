use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV bar data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// A price is usable only when it is finite and strictly positive.
pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

/// Discrete recommendation produced by the signal scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

/// A scored recommendation with the reasons that produced it, in rule order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub signal: SignalCategory,
    pub score: i32,
    pub reasons: Vec<String>,
}

/// Where the current price sits relative to a moving average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceVsSma {
    Above,
    Below,
}

impl PriceVsSma {
    /// A price exactly on the average counts as above.
    pub fn of(price: f64, sma: f64) -> Self {
        if price >= sma {
            PriceVsSma::Above
        } else {
            PriceVsSma::Below
        }
    }
}

/// Per-ticker analytical snapshot.
///
/// `None` always means "unknown"; no field is ever defaulted to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub ticker: String,
    pub name: String,
    pub price: f64,
    pub market_cap: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub price_to_earnings: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub delta_from_52_week_high: Option<f64>,
    pub ytd_change: Option<f64>,
    pub one_year_change: Option<f64>,
    pub one_month_change: Option<f64>,
    /// Most recent closes, oldest first
    pub historical_prices: Vec<f64>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub price_vs_sma_20: Option<PriceVsSma>,
    pub price_vs_sma_50: Option<PriceVsSma>,
    pub price_vs_sma_200: Option<PriceVsSma>,
    pub rsi: Option<f64>,
    pub short_term_signal: Option<Signal>,
    pub long_term_signal: Option<Signal>,
}

/// One hit from a ticker search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerMatch {
    pub symbol: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_price() {
        assert!(is_valid_price(0.01));
        assert!(!is_valid_price(0.0));
        assert!(!is_valid_price(-3.0));
        assert!(!is_valid_price(f64::NAN));
        assert!(!is_valid_price(f64::INFINITY));
    }

    #[test]
    fn test_price_vs_sma() {
        assert_eq!(PriceVsSma::of(101.0, 100.0), PriceVsSma::Above);
        assert_eq!(PriceVsSma::of(99.0, 100.0), PriceVsSma::Below);
        assert_eq!(PriceVsSma::of(100.0, 100.0), PriceVsSma::Above);
    }

    #[test]
    fn test_signal_serializes_snake_case() {
        let signal = Signal {
            signal: SignalCategory::StrongBuy,
            score: 45,
            reasons: vec!["RSI oversold (25.0)".to_string()],
        };
        let json = serde_json::to_value(&signal).unwrap();
        assert_eq!(json["signal"], "strong_buy");
        assert_eq!(json["score"], 45);
    }

    #[test]
    fn test_quote_field_names() {
        let quote = Quote {
            ticker: "AAPL".to_string(),
            name: "Apple Inc.".to_string(),
            price: 190.0,
            market_cap: Some(2.9e12),
            price_to_sales: None,
            price_to_earnings: None,
            fifty_two_week_high: Some(199.6),
            delta_from_52_week_high: Some(-4.8),
            ytd_change: None,
            one_year_change: None,
            one_month_change: None,
            historical_prices: vec![188.0, 190.0],
            sma_20: Some(185.0),
            sma_50: None,
            sma_200: None,
            price_vs_sma_20: Some(PriceVsSma::Above),
            price_vs_sma_50: None,
            price_vs_sma_200: None,
            rsi: None,
            short_term_signal: None,
            long_term_signal: None,
        };

        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["marketCap"], 2.9e12);
        assert_eq!(json["fiftyTwoWeekHigh"], 199.6);
        assert_eq!(json["deltaFrom52WeekHigh"], -4.8);
        assert_eq!(json["priceVsSma20"], "above");
        assert!(json["priceToEarnings"].is_null());
        assert_eq!(json["historicalPrices"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_ticker_match_type_field() {
        let m = TickerMatch {
            symbol: "MSFT".to_string(),
            name: "Microsoft Corp".to_string(),
            kind: "CS".to_string(),
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["type"], "CS");
    }
}
