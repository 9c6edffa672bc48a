//! Heuristic short- and long-horizon signal scoring.
//!
//! Every rule is a named `Rule` (threshold + signed weight) in the
//! `short_term` / `long_term` tables below. Absent inputs skip their rules.

use analysis_core::{Signal, SignalCategory};
use serde::{Deserialize, Serialize};

use crate::indicators::percent_change;

pub const MIN_SCORE: i32 = -100;
pub const MAX_SCORE: i32 = 100;

/// A threshold and the weight added to the score when it triggers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub threshold: f64,
    pub weight: i32,
}

/// Score cut-offs for mapping a score onto a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryThresholds {
    pub strong_buy: i32,
    pub buy: i32,
    pub sell: i32,
    pub strong_sell: i32,
}

impl CategoryThresholds {
    pub fn categorize(&self, score: i32) -> SignalCategory {
        match score {
            s if s >= self.strong_buy => SignalCategory::StrongBuy,
            s if s >= self.buy => SignalCategory::Buy,
            s if s <= self.strong_sell => SignalCategory::StrongSell,
            s if s <= self.sell => SignalCategory::Sell,
            _ => SignalCategory::Hold,
        }
    }
}

pub mod short_term {
    use super::{CategoryThresholds, Rule};

    pub const RSI_OVERSOLD: Rule = Rule { threshold: 30.0, weight: 30 };
    pub const RSI_NEAR_OVERSOLD: Rule = Rule { threshold: 40.0, weight: 15 };
    pub const RSI_OVERBOUGHT: Rule = Rule { threshold: 70.0, weight: -30 };
    pub const RSI_NEAR_OVERBOUGHT: Rule = Rule { threshold: 60.0, weight: -15 };

    /// Percent distance from SMA-20
    pub const BELOW_SMA_20: Rule = Rule { threshold: -5.0, weight: 15 };
    pub const ABOVE_SMA_20: Rule = Rule { threshold: 5.0, weight: -10 };

    /// 5-bar percent change
    pub const MOMENTUM_UP: Rule = Rule { threshold: 5.0, weight: 10 };
    pub const MOMENTUM_DOWN: Rule = Rule { threshold: -5.0, weight: -10 };

    /// Recent/prior volume ratio; weight is signed by the 5-bar direction
    pub const VOLUME_SURGE: Rule = Rule { threshold: 1.5, weight: 10 };

    /// Percent band above the 52-week low / below the 52-week high
    pub const NEAR_52W_LOW: Rule = Rule { threshold: 5.0, weight: 10 };
    pub const NEAR_52W_HIGH: Rule = Rule { threshold: 2.0, weight: -10 };

    pub const THRESHOLDS: CategoryThresholds = CategoryThresholds {
        strong_buy: 40,
        buy: 15,
        sell: -15,
        strong_sell: -40,
    };
}

pub mod long_term {
    use super::{CategoryThresholds, Rule};

    /// SMA-50 against SMA-200
    pub const GOLDEN_CROSS: Rule = Rule { threshold: 0.0, weight: 20 };
    pub const DEATH_CROSS: Rule = Rule { threshold: 0.0, weight: -20 };

    pub const ABOVE_SMA_200: Rule = Rule { threshold: 0.0, weight: 15 };
    pub const BELOW_SMA_200: Rule = Rule { threshold: 0.0, weight: -15 };

    /// Percent delta from the 52-week high
    pub const NEAR_52W_HIGH: Rule = Rule { threshold: -5.0, weight: 10 };
    pub const FAR_FROM_52W_HIGH: Rule = Rule { threshold: -30.0, weight: -10 };

    /// One-year percent change bands
    pub const ONE_YEAR_SURGE: Rule = Rule { threshold: 50.0, weight: 15 };
    pub const ONE_YEAR_GAIN: Rule = Rule { threshold: 20.0, weight: 10 };
    pub const ONE_YEAR_CRASH: Rule = Rule { threshold: -30.0, weight: -15 };
    pub const ONE_YEAR_LOSS: Rule = Rule { threshold: -10.0, weight: -10 };

    /// Market capitalization tiers, USD
    pub const MEGA_CAP: Rule = Rule { threshold: 200e9, weight: 10 };
    pub const LARGE_CAP: Rule = Rule { threshold: 10e9, weight: 5 };

    pub const THRESHOLDS: CategoryThresholds = CategoryThresholds {
        strong_buy: 40,
        buy: 15,
        sell: -10,
        strong_sell: -30,
    };
}

/// Running score plus the reasons that moved it
#[derive(Debug, Default)]
struct Scorecard {
    score: i32,
    reasons: Vec<String>,
}

impl Scorecard {
    fn add(&mut self, rule: Rule, reason: String) {
        self.score += rule.weight;
        self.reasons.push(reason);
    }

    fn finish(self, thresholds: &CategoryThresholds) -> Signal {
        let score = self.score.clamp(MIN_SCORE, MAX_SCORE);
        Signal {
            signal: thresholds.categorize(score),
            score,
            reasons: self.reasons,
        }
    }
}

/// Inputs to the short-horizon scorer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShortTermInputs {
    pub price: f64,
    pub rsi: Option<f64>,
    pub sma_20: Option<f64>,
    pub momentum_5: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub high_52w: Option<f64>,
    pub low_52w: Option<f64>,
}

impl ShortTermInputs {
    pub fn has_data(&self) -> bool {
        self.rsi.is_some()
            || self.sma_20.is_some()
            || self.momentum_5.is_some()
            || self.high_52w.is_some()
            || self.low_52w.is_some()
    }
}

/// Inputs to the long-horizon scorer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LongTermInputs {
    pub price: f64,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub delta_from_52w_high: Option<f64>,
    pub one_year_change: Option<f64>,
    pub market_cap: Option<f64>,
}

impl LongTermInputs {
    pub fn has_data(&self) -> bool {
        self.sma_50.is_some()
            || self.sma_200.is_some()
            || self.delta_from_52w_high.is_some()
            || self.one_year_change.is_some()
            || self.market_cap.is_some()
    }
}

/// Short-horizon score: RSI zones, SMA-20 stretch, 5-bar momentum,
/// volume surge, and the 52-week band.
pub fn score_short_term(inputs: &ShortTermInputs) -> Signal {
    use short_term::*;

    let mut card = Scorecard::default();
    let price = inputs.price;

    if let Some(rsi) = inputs.rsi {
        if rsi < RSI_OVERSOLD.threshold {
            card.add(RSI_OVERSOLD, format!("RSI oversold ({:.1})", rsi));
        } else if rsi < RSI_NEAR_OVERSOLD.threshold {
            card.add(RSI_NEAR_OVERSOLD, format!("RSI approaching oversold ({:.1})", rsi));
        } else if rsi > RSI_OVERBOUGHT.threshold {
            card.add(RSI_OVERBOUGHT, format!("RSI overbought ({:.1})", rsi));
        } else if rsi > RSI_NEAR_OVERBOUGHT.threshold {
            card.add(RSI_NEAR_OVERBOUGHT, format!("RSI approaching overbought ({:.1})", rsi));
        }
    }

    if let Some(sma_20) = inputs.sma_20.filter(|s| *s > 0.0) {
        let distance = percent_change(price, sma_20);
        if distance < BELOW_SMA_20.threshold {
            card.add(
                BELOW_SMA_20,
                format!("Price {:.1}% below SMA20 (potential bounce)", distance.abs()),
            );
        } else if distance > ABOVE_SMA_20.threshold {
            card.add(
                ABOVE_SMA_20,
                format!("Price {:.1}% above SMA20 (overextended)", distance),
            );
        }
    }

    if let Some(momentum) = inputs.momentum_5 {
        if momentum > MOMENTUM_UP.threshold {
            card.add(MOMENTUM_UP, format!("Strong 5-day momentum (+{:.1}%)", momentum));
        } else if momentum < MOMENTUM_DOWN.threshold {
            card.add(MOMENTUM_DOWN, format!("Weak 5-day momentum ({:.1}%)", momentum));
        }

        if let Some(ratio) = inputs.volume_ratio {
            if ratio > VOLUME_SURGE.threshold && momentum != 0.0 {
                let (rule, direction) = if momentum > 0.0 {
                    (VOLUME_SURGE, "buying")
                } else {
                    (Rule { weight: -VOLUME_SURGE.weight, ..VOLUME_SURGE }, "selling")
                };
                card.add(rule, format!("Volume surge ({:.1}x) on {} pressure", ratio, direction));
            }
        }
    }

    if let Some(low) = inputs.low_52w.filter(|l| *l > 0.0) {
        if price <= low * (1.0 + NEAR_52W_LOW.threshold / 100.0) {
            card.add(NEAR_52W_LOW, "Trading near 52-week low".to_string());
        }
    }

    if let Some(high) = inputs.high_52w.filter(|h| *h > 0.0) {
        if price >= high * (1.0 - NEAR_52W_HIGH.threshold / 100.0) {
            card.add(NEAR_52W_HIGH, "Trading near 52-week high (resistance)".to_string());
        }
    }

    card.finish(&THRESHOLDS)
}

/// Long-horizon score: moving-average crossover, trend position, distance
/// from the 52-week high, one-year return, and size tier.
pub fn score_long_term(inputs: &LongTermInputs) -> Signal {
    use long_term::*;

    let mut card = Scorecard::default();
    let price = inputs.price;

    if let (Some(sma_50), Some(sma_200)) = (inputs.sma_50, inputs.sma_200) {
        let spread = sma_50 - sma_200;
        if spread > GOLDEN_CROSS.threshold {
            card.add(GOLDEN_CROSS, "Golden cross (SMA50 above SMA200)".to_string());
        } else if spread < DEATH_CROSS.threshold {
            card.add(DEATH_CROSS, "Death cross (SMA50 below SMA200)".to_string());
        }
    }

    if let Some(sma_200) = inputs.sma_200.filter(|s| *s > 0.0) {
        let distance = percent_change(price, sma_200);
        if distance > ABOVE_SMA_200.threshold {
            card.add(ABOVE_SMA_200, format!("Price {:.1}% above SMA200 (uptrend)", distance));
        } else if distance < BELOW_SMA_200.threshold {
            card.add(BELOW_SMA_200, format!("Price {:.1}% below SMA200 (downtrend)", distance.abs()));
        }
    }

    if let Some(delta) = inputs.delta_from_52w_high {
        if delta >= NEAR_52W_HIGH.threshold {
            card.add(NEAR_52W_HIGH, format!("Within {:.1}% of 52-week high", delta.abs()));
        } else if delta < FAR_FROM_52W_HIGH.threshold {
            card.add(FAR_FROM_52W_HIGH, format!("{:.1}% below 52-week high", delta.abs()));
        }
    }

    if let Some(change) = inputs.one_year_change {
        if change > ONE_YEAR_SURGE.threshold {
            card.add(ONE_YEAR_SURGE, format!("Up {:.1}% over one year", change));
        } else if change > ONE_YEAR_GAIN.threshold {
            card.add(ONE_YEAR_GAIN, format!("Up {:.1}% over one year", change));
        } else if change < ONE_YEAR_CRASH.threshold {
            card.add(ONE_YEAR_CRASH, format!("Down {:.1}% over one year", change.abs()));
        } else if change < ONE_YEAR_LOSS.threshold {
            card.add(ONE_YEAR_LOSS, format!("Down {:.1}% over one year", change.abs()));
        }
    }

    if let Some(cap) = inputs.market_cap {
        if cap >= MEGA_CAP.threshold {
            card.add(MEGA_CAP, "Mega-cap stability".to_string());
        } else if cap >= LARGE_CAP.threshold {
            card.add(LARGE_CAP, "Large-cap stability".to_string());
        }
    }

    card.finish(&THRESHOLDS)
}
