// ═══════════════════════════════════════════════════════════════════
// Model Tests: Pick, WatchlistEntry, envelopes, quotes, settings
// ═══════════════════════════════════════════════════════════════════

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use std::collections::HashMap;

use bullsbears_core::errors::CoreError;
use bullsbears_core::models::chart::series_from_bars;
use bullsbears_core::models::envelope::{ApiEnvelope, ApiOutcome};
use bullsbears_core::models::market::OhlcBar;
use bullsbears_core::models::percent_change;
use bullsbears_core::models::pick::{OutcomeStatus, Pick, Sentiment, TargetRange};
use bullsbears_core::models::quote::{Quote, QuoteCache};
use bullsbears_core::models::rate_limit::RateLimitStatus;
use bullsbears_core::models::settings::{Settings, DEFAULT_API_BASE_URL, MAX_QUOTE_TTL_SECS};
use bullsbears_core::models::watchlist::{validate_price, WatchlistEntry, WatchlistStatus};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
}

fn bullish_pick() -> Pick {
    Pick::new(
        "aapl",
        Sentiment::Bullish,
        82.0,
        190.0,
        TargetRange::new(195.0, 200.0, 210.0),
        182.0,
        now(),
    )
}

fn bearish_entry(entry: f64, current: Option<f64>) -> WatchlistEntry {
    let mut e = WatchlistEntry::new("TSLA", Sentiment::Bearish, entry, entry * 0.9, entry * 1.05, now());
    e.current_price = current;
    e
}

// ═══════════════════════════════════════════════════════════════════
// percent_change
// ═══════════════════════════════════════════════════════════════════

mod percent_change_fn {
    use super::*;

    #[test]
    fn gain() {
        assert!((percent_change(100.0, Some(110.0)) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn loss() {
        assert!((percent_change(200.0, Some(150.0)) + 25.0).abs() < 1e-9);
    }

    #[test]
    fn missing_current_is_zero() {
        assert_eq!(percent_change(100.0, None), 0.0);
    }

    #[test]
    fn zero_entry_is_zero_not_infinite() {
        assert_eq!(percent_change(0.0, Some(50.0)), 0.0);
    }

    #[test]
    fn non_finite_result_is_zero() {
        assert_eq!(percent_change(100.0, Some(f64::NAN)), 0.0);
        assert_eq!(percent_change(100.0, Some(f64::INFINITY)), 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Pick
// ═══════════════════════════════════════════════════════════════════

mod pick {
    use super::*;

    #[test]
    fn new_uppercases_symbol_and_generates_id() {
        let p = bullish_pick();
        assert_eq!(p.symbol, "AAPL");
        assert!(!p.id.is_empty());
        assert!(!p.added_to_watchlist);
        assert!(p.outcome.is_none());
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(bullish_pick().id, bullish_pick().id);
    }

    #[test]
    fn effective_confidence_prefers_final() {
        let mut p = bullish_pick();
        assert_eq!(p.effective_confidence(), 82.0);
        p.final_confidence = Some(74.5);
        assert_eq!(p.effective_confidence(), 74.5);
    }

    #[test]
    fn valid_bullish_pick() {
        assert!(bullish_pick().validate().is_ok());
    }

    #[test]
    fn valid_bearish_pick_has_descending_targets() {
        let p = Pick::new(
            "TSLA",
            Sentiment::Bearish,
            70.0,
            180.0,
            TargetRange::new(170.0, 160.0, 150.0),
            188.0,
            now(),
        );
        assert!(p.validate().is_ok());
    }

    #[test]
    fn rejects_unordered_targets() {
        let mut p = bullish_pick();
        p.targets = TargetRange::new(200.0, 195.0, 210.0);
        assert!(matches!(p.validate(), Err(CoreError::ValidationError(_))));
    }

    #[test]
    fn bearish_with_ascending_targets_rejected() {
        let mut p = bullish_pick();
        p.sentiment = Sentiment::Bearish;
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_confidence_out_of_range() {
        let mut p = bullish_pick();
        p.confidence = 101.0;
        assert!(p.validate().is_err());

        let mut p = bullish_pick();
        p.final_confidence = Some(-1.0);
        assert!(p.validate().is_err());

        let mut p = bullish_pick();
        p.confidence = f64::NAN;
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_negative_or_non_finite_prices() {
        let mut p = bullish_pick();
        p.stop_loss = -1.0;
        assert!(p.validate().is_err());

        let mut p = bullish_pick();
        p.entry_price = f64::INFINITY;
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_empty_symbol() {
        let mut p = bullish_pick();
        p.symbol = "  ".into();
        assert!(p.validate().is_err());
    }

    #[test]
    fn deserializes_backend_payload_with_defaults() {
        let json = r#"{
            "id": "pick-42",
            "symbol": "NVDA",
            "sentiment": "bullish",
            "confidence": 88,
            "entry_price": 875.0,
            "targets": { "low": 900.0, "mid": 925.0, "high": 960.0 },
            "stop_loss": 850.0,
            "created_at": "2025-01-14T15:30:00Z",
            "outcome": "moonshot"
        }"#;
        let p: Pick = serde_json::from_str(json).unwrap();
        assert_eq!(p.id, "pick-42");
        assert_eq!(p.sentiment, Sentiment::Bullish);
        assert_eq!(p.outcome, Some(OutcomeStatus::Moonshot));
        assert!(p.final_confidence.is_none());
        assert!(p.current_price.is_none());
        assert!(!p.added_to_watchlist);
    }

    #[test]
    fn missing_id_is_generated() {
        let json = r#"{
            "symbol": "AMD",
            "sentiment": "bearish",
            "confidence": 61,
            "entry_price": 160.0,
            "targets": { "low": 150.0, "mid": 145.0, "high": 140.0 },
            "stop_loss": 168.0,
            "created_at": "2025-01-14T15:30:00Z"
        }"#;
        let p: Pick = serde_json::from_str(json).unwrap();
        assert!(!p.id.is_empty());
    }

    #[test]
    fn sentiment_display() {
        assert_eq!(Sentiment::Bullish.to_string(), "bullish");
        assert_eq!(OutcomeStatus::Win.to_string(), "win");
    }
}

// ═══════════════════════════════════════════════════════════════════
// WatchlistEntry
// ═══════════════════════════════════════════════════════════════════

mod watchlist_entry {
    use super::*;

    #[test]
    fn from_pick_targets_mid() {
        let mut pick = bullish_pick();
        pick.current_price = Some(192.0);
        let e = WatchlistEntry::from_pick(&pick, now());
        assert_eq!(e.symbol, "AAPL");
        assert_eq!(e.entry_price, 190.0);
        assert_eq!(e.target_price, 200.0);
        assert_eq!(e.stop_loss, 182.0);
        assert_eq!(e.current_price, Some(192.0));
        assert_eq!(e.pick_id.as_deref(), Some(pick.id.as_str()));
        assert_eq!(e.status, WatchlistStatus::Active);
    }

    #[test]
    fn return_is_direction_aware() {
        let bull = {
            let mut e = WatchlistEntry::new("AAPL", Sentiment::Bullish, 100.0, 110.0, 95.0, now());
            e.current_price = Some(105.0);
            e
        };
        assert!((bull.return_pct() - 5.0).abs() < 1e-9);

        let bear = bearish_entry(100.0, Some(90.0));
        assert!((bear.percent_change() + 10.0).abs() < 1e-9);
        assert!((bear.return_pct() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn close_locks_exit() {
        let mut e = bearish_entry(100.0, Some(92.0));
        e.close(91.0, now()).unwrap();
        assert!(e.is_closed());
        assert_eq!(e.exit_price, Some(91.0));
        assert_eq!(e.exit_date, Some(now()));
        assert_eq!(e.mark_price(), Some(91.0));
    }

    #[test]
    fn mark_price_ignores_live_price_after_close() {
        let mut e = bearish_entry(100.0, Some(92.0));
        e.close(91.0, now()).unwrap();
        e.current_price = Some(120.0);
        assert!((e.return_pct() - 9.0).abs() < 1e-9);
    }

    #[test]
    fn close_twice_fails() {
        let mut e = bearish_entry(100.0, Some(92.0));
        e.close(91.0, now()).unwrap();
        let err = e.close(80.0, now()).unwrap_err();
        assert!(matches!(err, CoreError::EntryClosed(_)));
        assert_eq!(e.exit_price, Some(91.0));
    }

    #[test]
    fn close_rejects_bad_price() {
        let mut e = bearish_entry(100.0, None);
        assert!(e.close(0.0, now()).is_err());
        assert!(e.close(f64::NAN, now()).is_err());
        assert!(!e.is_closed());
    }

    #[test]
    fn target_and_stop_hits() {
        let mut bull = WatchlistEntry::new("AAPL", Sentiment::Bullish, 100.0, 110.0, 95.0, now());
        assert!(!bull.target_hit());
        bull.current_price = Some(111.0);
        assert!(bull.target_hit());
        bull.current_price = Some(94.0);
        assert!(bull.stop_hit());

        let bear = bearish_entry(100.0, Some(89.0));
        assert!(bear.target_hit());
        assert!(!bear.stop_hit());
    }

    #[test]
    fn validate_price_rules() {
        assert!(validate_price("entry price", 12.5).is_ok());
        assert!(validate_price("entry price", 0.0).is_err());
        assert!(validate_price("entry price", -3.0).is_err());
        assert!(validate_price("entry price", f64::INFINITY).is_err());
    }

    #[test]
    fn status_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&WatchlistStatus::Closed).unwrap(), "\"CLOSED\"");
        assert_eq!(WatchlistStatus::Active.to_string(), "ACTIVE");
    }
}

// ═══════════════════════════════════════════════════════════════════
// ApiEnvelope
// ═══════════════════════════════════════════════════════════════════

mod envelope {
    use super::*;

    fn parse(json: &str) -> ApiOutcome<Vec<u32>> {
        serde_json::from_str::<ApiEnvelope<Vec<u32>>>(json)
            .unwrap()
            .into_outcome()
    }

    #[test]
    fn success_with_data() {
        assert_eq!(parse(r#"{"success": true, "data": [1, 2]}"#), ApiOutcome::Success(vec![1, 2]));
    }

    #[test]
    fn success_without_data_is_failure() {
        assert!(matches!(parse(r#"{"success": true}"#), ApiOutcome::Failure { .. }));
        assert!(matches!(
            parse(r#"{"success": true, "data": null}"#),
            ApiOutcome::Failure { .. }
        ));
    }

    #[test]
    fn failure_carries_error() {
        assert_eq!(
            parse(r#"{"success": false, "error": "Model offline"}"#),
            ApiOutcome::Failure {
                error: "Model offline".into()
            }
        );
    }

    #[test]
    fn failure_falls_back_to_message_then_default() {
        assert_eq!(
            parse(r#"{"success": false, "message": "Try later"}"#),
            ApiOutcome::Failure {
                error: "Try later".into()
            }
        );
        assert_eq!(
            parse(r#"{"success": false}"#),
            ApiOutcome::Failure {
                error: "Unknown error".into()
            }
        );
    }

    #[test]
    fn rate_limit_flag_wins() {
        assert_eq!(
            parse(r#"{"success": false, "rate_limit_exceeded": true, "message": "Resets at 00:00 UTC"}"#),
            ApiOutcome::RateLimited {
                message: "Resets at 00:00 UTC".into()
            }
        );
        assert_eq!(
            parse(r#"{"success": true, "data": [1], "rate_limit_exceeded": true}"#),
            ApiOutcome::RateLimited {
                message: "Daily limit reached".into()
            }
        );
    }

    #[test]
    fn into_result_maps_variants() {
        let ok: Result<u32, CoreError> = ApiOutcome::Success(7).into_result("/x");
        assert_eq!(ok.unwrap(), 7);

        let err = ApiOutcome::<u32>::Failure { error: "nope".into() }
            .into_result("/backtest")
            .unwrap_err();
        assert!(matches!(err, CoreError::Api { endpoint, message } if endpoint == "/backtest" && message == "nope"));

        let err = ApiOutcome::<u32>::RateLimited { message: "m".into() }
            .into_result("/generate-plays")
            .unwrap_err();
        assert!(matches!(err, CoreError::RateLimited { .. }));
    }
}

// ═══════════════════════════════════════════════════════════════════
// RateLimitStatus
// ═══════════════════════════════════════════════════════════════════

mod rate_limit {
    use super::*;

    fn status(usage: u32, limit: u32) -> RateLimitStatus {
        RateLimitStatus {
            current_usage: usage,
            daily_limit: limit,
            remaining: limit.saturating_sub(usage),
            reset_time: now() + Duration::hours(12),
        }
    }

    #[test]
    fn exhausted_when_nothing_remains() {
        assert!(status(5, 5).is_exhausted());
        assert!(!status(4, 5).is_exhausted());
    }

    #[test]
    fn usage_pct() {
        assert!((status(3, 12).usage_pct() - 25.0).abs() < 1e-9);
        assert_eq!(status(0, 0).usage_pct(), 0.0);
    }

    #[test]
    fn deserializes() {
        let json = r#"{"current_usage": 2, "daily_limit": 5, "remaining": 3, "reset_time": "2025-01-16T00:00:00Z"}"#;
        let s: RateLimitStatus = serde_json::from_str(json).unwrap();
        assert_eq!(s.remaining, 3);
    }
}

// ═══════════════════════════════════════════════════════════════════
// QuoteCache
// ═══════════════════════════════════════════════════════════════════

mod quote_cache {
    use super::*;

    fn quote(symbol: &str, price: f64, at: DateTime<Utc>) -> Quote {
        Quote {
            symbol: symbol.into(),
            price,
            fetched_at: at,
            source: "Mock".into(),
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut cache = QuoteCache::new();
        cache.insert(quote("aapl", 190.0, now()));
        assert_eq!(cache.get("AAPL").map(|q| q.price), Some(190.0));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn freshness_respects_ttl() {
        let mut cache = QuoteCache::new();
        cache.insert(quote("AAPL", 190.0, now()));
        let ttl = Duration::seconds(60);
        assert!(cache.get_fresh("AAPL", now() + Duration::seconds(59), ttl).is_some());
        assert!(cache.get_fresh("AAPL", now() + Duration::seconds(60), ttl).is_none());
    }

    #[test]
    fn prune_before() {
        let mut cache = QuoteCache::new();
        cache.insert(quote("OLD", 1.0, now() - Duration::days(2)));
        cache.insert(quote("NEW", 2.0, now()));
        assert_eq!(cache.prune_before(now() - Duration::days(1)), 1);
        assert!(cache.get("OLD").is_none());
        assert!(cache.get("NEW").is_some());
        cache.clear();
        assert!(cache.is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Chart series
// ═══════════════════════════════════════════════════════════════════

mod chart {
    use super::*;

    fn bar(day: u32, close: f64) -> OhlcBar {
        OhlcBar {
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
        }
    }

    #[test]
    fn series_is_sorted_oldest_first() {
        let series = series_from_bars(&[bar(3, 12.0), bar(1, 10.0), bar(2, 11.0)]);
        let values: Vec<f64> = series.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![10.0, 11.0, 12.0]);
        assert_eq!(series[2].day, 2);
    }

    #[test]
    fn empty_bars_empty_series() {
        assert!(series_from_bars(&[]).is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(s.watchlist_refresh_secs, 180);
        assert_eq!(s.options_refresh_secs, 300);
        assert!(s.demo_fallback);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn overrides_from_lookup() {
        let s = Settings::from_lookup(lookup(&[
            ("BULLSBEARS_API_URL", "https://api.example.com/v1/"),
            ("BULLSBEARS_WATCHLIST_REFRESH_SECS", "60"),
            ("BULLSBEARS_DEMO_FALLBACK", "false"),
            ("ALPHAVANTAGE_API_KEY", " demo-key "),
        ]))
        .unwrap();
        assert_eq!(s.api_base_url, "https://api.example.com/v1");
        assert_eq!(s.watchlist_refresh_secs, 60);
        assert!(!s.demo_fallback);
        assert_eq!(s.api_keys.get("alphavantage").map(String::as_str), Some("demo-key"));
    }

    #[test]
    fn empty_lookup_gives_defaults() {
        assert_eq!(Settings::from_lookup(|_| None).unwrap(), Settings::default());
    }

    #[test]
    fn rejects_zero_interval() {
        let err = Settings::from_lookup(lookup(&[("BULLSBEARS_OPTIONS_REFRESH_SECS", "0")])).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn rejects_garbage_number() {
        assert!(Settings::from_lookup(lookup(&[("BULLSBEARS_TIMEOUT_SECS", "soon")])).is_err());
    }

    #[test]
    fn rejects_non_http_url() {
        assert!(Settings::from_lookup(lookup(&[("BULLSBEARS_API_URL", "ftp://x")])).is_err());
    }

    #[test]
    fn rejects_oversized_quote_ttl() {
        let err = Settings::from_lookup(lookup(&[("BULLSBEARS_QUOTE_TTL_SECS", "100000000000000000")])).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));

        let s = Settings {
            quote_ttl_secs: MAX_QUOTE_TTL_SECS + 1,
            ..Settings::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn accepts_quote_ttl_at_the_maximum() {
        let max = MAX_QUOTE_TTL_SECS.to_string();
        let s = Settings::from_lookup(lookup(&[("BULLSBEARS_QUOTE_TTL_SECS", max.as_str())])).unwrap();
        assert_eq!(s.quote_ttl_secs, MAX_QUOTE_TTL_SECS);
    }
}
