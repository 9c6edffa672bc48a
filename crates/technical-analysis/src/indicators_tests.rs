#[cfg(test)]
mod tests {
    use super::super::indicators::*;
    use analysis_core::Bar;
    use chrono::{TimeZone, Utc};

    // Helper function to create sample price data
    fn sample_prices() -> Vec<f64> {
        vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ]
    }

    // Daily bars from closes, with a fixed high/low spread
    fn bars_from(closes: &[f64], volumes: &[f64]) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 21, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: start + chrono::Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: volumes.get(i).copied().unwrap_or(1_000_000.0),
            })
            .collect()
    }

    #[test]
    fn test_sma_basic() {
        let data = vec![10.0, 20.0, 30.0];
        assert_eq!(sma(&data, 3), Some(20.0));
    }

    #[test]
    fn test_sma_uses_most_recent_window() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&data, 3).unwrap();
        assert!((result - 4.0).abs() < 1e-9); // (3+4+5)/3
    }

    #[test]
    fn test_sma_insufficient_data() {
        let data = vec![1.0, 2.0];
        assert_eq!(sma(&data, 5), None);
        assert_eq!(sma(&data, 0), None);
        assert_eq!(sma(&[], 1), None);
    }

    #[test]
    fn test_sma_real_prices() {
        let prices = sample_prices();
        let result = sma(&prices, 5).unwrap();
        let expected = (46.03 + 46.41 + 46.22 + 45.64 + 46.00) / 5.0;
        assert!((result - expected).abs() < 0.01);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let data: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
        assert_eq!(rsi(&data, 14), None);
    }

    #[test]
    fn test_rsi_all_gains_is_100() {
        let data: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        assert_eq!(rsi(&data, 14), Some(100.0));
    }

    #[test]
    fn test_rsi_all_losses_is_0() {
        let data: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let value = rsi(&data, 14).unwrap();
        assert!(value.abs() < 1e-9);
    }

    #[test]
    fn test_rsi_flat_prices() {
        // No losses at all, so the all-gains convention applies
        let data = vec![50.0; 20];
        assert_eq!(rsi(&data, 14), Some(100.0));
    }

    #[test]
    fn test_rsi_bounded() {
        let prices = sample_prices();
        let value = rsi(&prices, 14).unwrap();
        assert!((0.0..=100.0).contains(&value));
    }

    #[test]
    fn test_rsi_balanced_moves() {
        // Alternating +1/-1 over an even number of transitions
        let mut data = vec![100.0];
        for i in 0..14 {
            let last = *data.last().unwrap();
            data.push(if i % 2 == 0 { last + 1.0 } else { last - 1.0 });
        }
        let value = rsi(&data, 14).unwrap();
        assert!((value - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_only_looks_at_last_period() {
        // A crash long before the window must not matter
        let mut data = vec![500.0, 100.0];
        data.extend((1..=14).map(|i| 100.0 + i as f64));
        assert_eq!(rsi(&data, 14), Some(100.0));
    }

    #[test]
    fn test_percent_change() {
        assert!((percent_change(110.0, 100.0) - 10.0).abs() < 1e-9);
        assert!((percent_change(90.0, 100.0) + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_percent_change_zero_baseline() {
        let value = percent_change(42.0, 0.0);
        assert_eq!(value, 0.0);
        assert!(value.is_finite());
    }

    #[test]
    fn test_momentum() {
        let data = vec![100.0, 101.0, 102.0, 103.0, 104.0, 110.0];
        let value = momentum(&data, 5).unwrap();
        assert!((value - 10.0).abs() < 1e-9);
        assert_eq!(momentum(&data[..5], 5), None);
    }

    #[test]
    fn test_volume_ratio() {
        let closes = vec![10.0; 10];
        let volumes = vec![100.0, 100.0, 100.0, 100.0, 100.0, 200.0, 200.0, 200.0, 200.0, 200.0];
        let bars = bars_from(&closes, &volumes);
        assert_eq!(volume_ratio(&bars, 5), Some(2.0));
        assert_eq!(volume_ratio(&bars[..9], 5), None);
    }

    #[test]
    fn test_volume_ratio_zero_prior_volume() {
        let closes = vec![10.0; 10];
        let volumes = vec![0.0, 0.0, 0.0, 0.0, 0.0, 5.0, 5.0, 5.0, 5.0, 5.0];
        let bars = bars_from(&closes, &volumes);
        assert_eq!(volume_ratio(&bars, 5), None);
    }

    #[test]
    fn test_high_low_range() {
        let bars = bars_from(&[10.0, 15.0, 12.0], &[]);
        assert_eq!(highest_high(&bars), Some(16.0));
        assert_eq!(lowest_low(&bars), Some(9.0));
        assert_eq!(highest_high(&[]), None);
    }

    #[test]
    fn test_indicator_set_short_history() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let set = IndicatorSet::from_bars(&bars_from(&closes, &[]));

        assert!(set.sma_20.is_some());
        assert!(set.sma_50.is_none());
        assert!(set.sma_200.is_none());
        assert_eq!(set.rsi, Some(100.0));
        assert!(set.momentum_5.is_some());
        assert_eq!(set.volume_ratio, Some(1.0));
    }

    #[test]
    fn test_indicator_set_full_year() {
        let closes: Vec<f64> = (0..252).map(|i| 100.0 + (i as f64 * 0.1).sin() * 5.0).collect();
        let set = IndicatorSet::from_bars(&bars_from(&closes, &[]));

        assert!(set.sma_20.is_some());
        assert!(set.sma_50.is_some());
        assert!(set.sma_200.is_some());
        let rsi = set.rsi.unwrap();
        assert!((0.0..=100.0).contains(&rsi));
    }

    #[test]
    fn test_indicator_set_empty() {
        assert_eq!(IndicatorSet::from_bars(&[]), IndicatorSet::default());
    }
}
