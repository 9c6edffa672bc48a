use analysis_core::{is_valid_price, Bar, Clock, PriceVsSma, Quote, QuoteError};
use chrono::{Datelike, Duration, Months, NaiveDate};
use polygon_client::{
    parse_aggregates, parse_details, parse_snapshot, to_vendor_symbol, SnapshotTicker, TickerDetails,
};
use std::sync::Arc;
use technical_analysis::{
    percent_change, score_long_term, score_short_term, IndicatorSet, LongTermInputs, ShortTermInputs,
};

use crate::ticker::sanitize_ticker;
use crate::upstream::CachedUpstream;

/// Calendar span of the historical bar request
const HISTORY_DAYS: i64 = 365;

/// Folds the three per-ticker upstream facets into one `Quote`.
pub struct SnapshotAssembler {
    upstream: Arc<CachedUpstream>,
    clock: Arc<dyn Clock>,
    history_window: usize,
}

impl SnapshotAssembler {
    pub fn new(upstream: Arc<CachedUpstream>, clock: Arc<dyn Clock>, history_window: usize) -> Self {
        Self {
            upstream,
            clock,
            history_window,
        }
    }

    /// Build a quote for `raw_ticker`.
    ///
    /// Sanitization failures return before any network call. Each facet
    /// fails on its own; only a ticker with no facets, or no usable price,
    /// is `NotFound`.
    pub async fn assemble(&self, raw_ticker: &str) -> Result<Quote, QuoteError> {
        let ticker = match sanitize_ticker(raw_ticker) {
            Some(t) => t,
            None => {
                tracing::warn!("Rejected ticker {:?}: nothing left after sanitization", raw_ticker);
                return Err(QuoteError::InvalidTicker);
            }
        };
        let vendor_symbol = to_vendor_symbol(&ticker);

        let today = self.clock.now().date_naive();
        let from = today - Duration::days(HISTORY_DAYS);

        let (snapshot, details, bars) = tokio::join!(
            self.fetch_snapshot(&vendor_symbol),
            self.fetch_details(&vendor_symbol),
            self.fetch_bars(&vendor_symbol, from, today),
        );

        if snapshot.is_none() && details.is_none() && bars.is_empty() {
            tracing::info!("No upstream data at all for {}", ticker);
            return Err(QuoteError::NotFound);
        }

        let price = match resolve_price(snapshot.as_ref(), &bars) {
            Some(p) => p,
            None => {
                tracing::warn!("No usable price for {}", ticker);
                return Err(QuoteError::NotFound);
            }
        };

        Ok(build_quote(ticker, price, details.as_ref(), &bars, today, self.history_window))
    }

    async fn fetch_snapshot(&self, symbol: &str) -> Option<SnapshotTicker> {
        let key = format!("snapshot:{}", symbol);
        let url = self.upstream.client().snapshot_url(symbol);
        match self.upstream.fetch(key, url, parse_snapshot).await {
            Ok(snap) => Some(snap),
            Err(e) => {
                tracing::warn!("Snapshot unavailable for {}: {}", symbol, e);
                None
            }
        }
    }

    async fn fetch_details(&self, symbol: &str) -> Option<TickerDetails> {
        let key = format!("details:{}", symbol);
        let url = self.upstream.client().details_url(symbol);
        match self.upstream.fetch(key, url, parse_details).await {
            Ok(details) => Some(details),
            Err(e) => {
                tracing::warn!("Ticker details unavailable for {}: {}", symbol, e);
                None
            }
        }
    }

    async fn fetch_bars(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> Vec<Bar> {
        let key = format!("bars:{}:{}:{}", symbol, from, to);
        let url = self.upstream.client().aggregates_url(symbol, from, to);
        match self.upstream.fetch(key, url, parse_aggregates).await {
            Ok(bars) => bars,
            Err(e) => {
                tracing::warn!("Historical bars unavailable for {}: {}", symbol, e);
                Vec::new()
            }
        }
    }
}

/// Intraday close, then previous close, then the last bar's close.
pub fn resolve_price(snapshot: Option<&SnapshotTicker>, bars: &[Bar]) -> Option<f64> {
    let intraday = snapshot.and_then(|s| s.intraday_close());
    let previous = snapshot.and_then(|s| s.previous_close());
    let last_bar = bars.last().map(|b| b.close);

    [intraday, previous, last_bar]
        .into_iter()
        .flatten()
        .find(|p| is_valid_price(*p))
}

/// Close of the first bar dated on or after `date`
fn baseline_close(bars: &[Bar], date: NaiveDate) -> Option<f64> {
    bars.iter()
        .find(|b| b.timestamp.date_naive() >= date)
        .map(|b| b.close)
}

fn change_since(price: f64, bars: &[Bar], date: Option<NaiveDate>) -> Option<f64> {
    date.and_then(|d| baseline_close(bars, d))
        .map(|baseline| percent_change(price, baseline))
}

/// Assemble the final record from resolved inputs. `bars` must be oldest first.
pub fn build_quote(
    ticker: String,
    price: f64,
    details: Option<&TickerDetails>,
    bars: &[Bar],
    today: NaiveDate,
    history_window: usize,
) -> Quote {
    let indicators = IndicatorSet::from_bars(bars);

    let fifty_two_week_high = indicators.high_52w;
    let delta_from_52_week_high = fifty_two_week_high.map(|high| percent_change(price, high));

    let year_start = NaiveDate::from_ymd_opt(today.year(), 1, 1);
    let ytd_change = change_since(price, bars, year_start);
    let one_month_change = change_since(price, bars, today.checked_sub_months(Months::new(1)));
    let one_year_change = change_since(price, bars, today.checked_sub_months(Months::new(12)));

    let market_cap = details
        .and_then(|d| d.market_cap)
        .filter(|cap| is_valid_price(*cap));

    let historical_prices: Vec<f64> = bars
        .iter()
        .skip(bars.len().saturating_sub(history_window))
        .map(|b| b.close)
        .collect();

    let short_inputs = ShortTermInputs {
        price,
        rsi: indicators.rsi,
        sma_20: indicators.sma_20,
        momentum_5: indicators.momentum_5,
        volume_ratio: indicators.volume_ratio,
        high_52w: indicators.high_52w,
        low_52w: indicators.low_52w,
    };
    let long_inputs = LongTermInputs {
        price,
        sma_50: indicators.sma_50,
        sma_200: indicators.sma_200,
        delta_from_52w_high: delta_from_52_week_high,
        one_year_change,
        market_cap,
    };

    let short_term_signal = short_inputs.has_data().then(|| score_short_term(&short_inputs));
    let long_term_signal = long_inputs.has_data().then(|| score_long_term(&long_inputs));

    let name = details
        .and_then(|d| d.name.clone())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| ticker.clone());

    Quote {
        ticker,
        name,
        price,
        market_cap,
        // The vendor's reference endpoint carries no valuation ratios
        price_to_sales: None,
        price_to_earnings: None,
        fifty_two_week_high,
        delta_from_52_week_high,
        ytd_change,
        one_year_change,
        one_month_change,
        historical_prices,
        sma_20: indicators.sma_20,
        sma_50: indicators.sma_50,
        sma_200: indicators.sma_200,
        price_vs_sma_20: indicators.sma_20.map(|s| PriceVsSma::of(price, s)),
        price_vs_sma_50: indicators.sma_50.map(|s| PriceVsSma::of(price, s)),
        price_vs_sma_200: indicators.sma_200.map(|s| PriceVsSma::of(price, s)),
        rsi: indicators.rsi,
        short_term_signal,
        long_term_signal,
    }
}
