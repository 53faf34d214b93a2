// ═══════════════════════════════════════════════════════════════════
// Storage Tests: BBDS file format, StorageManager
// ═══════════════════════════════════════════════════════════════════

use chrono::{TimeZone, Utc};

use bullsbears_core::errors::CoreError;
use bullsbears_core::models::dashboard::DashboardSnapshot;
use bullsbears_core::models::pick::{Pick, Sentiment, TargetRange};
use bullsbears_core::models::quote::Quote;
use bullsbears_core::models::rate_limit::RateLimitStatus;
use bullsbears_core::models::watchlist::WatchlistEntry;
use bullsbears_core::storage::format::{self, CURRENT_VERSION, HEADER_SIZE, MAGIC, MAX_PAYLOAD_LEN};
use bullsbears_core::storage::manager::StorageManager;

fn sample_snapshot() -> DashboardSnapshot {
    let at = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
    let mut pick = Pick::new(
        "NVDA",
        Sentiment::Bullish,
        88.0,
        875.0,
        TargetRange::new(900.0, 925.0, 960.0),
        850.0,
        at,
    );
    pick.final_confidence = Some(84.5);
    pick.added_to_watchlist = true;

    let mut active = WatchlistEntry::from_pick(&pick, at);
    active.current_price = Some(890.0);
    active.notes = "earnings next week".into();

    let mut closed = WatchlistEntry::new("TSLA", Sentiment::Bearish, 180.0, 160.0, 190.0, at);
    closed.close(165.0, at).unwrap();

    let mut snapshot = DashboardSnapshot {
        picks: vec![pick],
        watchlist: vec![active, closed],
        rate_limit: Some(RateLimitStatus {
            current_usage: 2,
            daily_limit: 5,
            remaining: 3,
            reset_time: at,
        }),
        ..DashboardSnapshot::default()
    };
    snapshot.quote_cache.insert(Quote {
        symbol: "NVDA".into(),
        price: 890.0,
        fetched_at: at,
        source: "BullsBears".into(),
    });
    snapshot
        .settings
        .api_keys
        .insert("alphavantage".into(), "demo".into());
    snapshot
}

// ═══════════════════════════════════════════════════════════════════
// File format
// ═══════════════════════════════════════════════════════════════════

mod file_format {
    use super::*;

    #[test]
    fn header_layout() {
        let bytes = format::write_file(CURRENT_VERSION, b"payload");
        assert_eq!(&bytes[0..4], MAGIC);
        assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), CURRENT_VERSION);
        assert_eq!(bytes.len(), HEADER_SIZE + 7);
    }

    #[test]
    fn read_back() {
        let bytes = format::write_file(CURRENT_VERSION, b"payload");
        let (header, payload) = format::read_file(&bytes).unwrap();
        assert_eq!(header.version, CURRENT_VERSION);
        assert_eq!(header.payload_len, 7);
        assert_eq!(payload, b"payload");
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut bytes = format::write_file(CURRENT_VERSION, b"abc");
        bytes.extend_from_slice(b"junk");
        let (_, payload) = format::read_file(&bytes).unwrap();
        assert_eq!(payload, b"abc");
    }

    #[test]
    fn too_small() {
        assert!(matches!(
            format::read_file(b"BBDS"),
            Err(CoreError::InvalidFileFormat(_))
        ));
    }

    #[test]
    fn bad_magic() {
        let mut bytes = format::write_file(CURRENT_VERSION, b"abc");
        bytes[0] = b'X';
        assert!(matches!(
            format::read_file(&bytes),
            Err(CoreError::InvalidFileFormat(_))
        ));
    }

    #[test]
    fn unsupported_versions() {
        let future = format::write_file(CURRENT_VERSION + 1, b"abc");
        assert!(matches!(
            format::read_file(&future),
            Err(CoreError::UnsupportedVersion(v)) if v == CURRENT_VERSION + 1
        ));
        let zero = format::write_file(0, b"abc");
        assert!(matches!(format::read_file(&zero), Err(CoreError::UnsupportedVersion(0))));
    }

    #[test]
    fn truncated_payload() {
        let bytes = format::write_file(CURRENT_VERSION, b"abcdef");
        assert!(matches!(
            format::read_file(&bytes[..bytes.len() - 2]),
            Err(CoreError::InvalidFileFormat(_))
        ));
    }

    #[test]
    fn oversized_length_rejected() {
        let mut bytes = format::write_file(CURRENT_VERSION, b"abc");
        bytes[6..HEADER_SIZE].copy_from_slice(&(MAX_PAYLOAD_LEN + 1).to_le_bytes());
        assert!(matches!(
            format::read_file(&bytes),
            Err(CoreError::InvalidFileFormat(_))
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════
// StorageManager
// ═══════════════════════════════════════════════════════════════════

mod storage_manager {
    use super::*;

    #[test]
    fn bytes_round_trip() {
        let snapshot = sample_snapshot();
        let bytes = StorageManager::save_to_bytes(&snapshot).unwrap();
        let restored = StorageManager::load_from_bytes(&bytes).unwrap();

        assert_eq!(restored.picks, snapshot.picks);
        assert_eq!(restored.watchlist, snapshot.watchlist);
        assert_eq!(restored.settings, snapshot.settings);
        assert_eq!(restored.rate_limit, snapshot.rate_limit);
        assert_eq!(restored.quote_cache.get("NVDA").map(|q| q.price), Some(890.0));
    }

    #[test]
    fn closed_entry_survives_round_trip() {
        let bytes = StorageManager::save_to_bytes(&sample_snapshot()).unwrap();
        let restored = StorageManager::load_from_bytes(&bytes).unwrap();
        let closed = restored.watchlist.iter().find(|e| e.symbol == "TSLA").unwrap();
        assert!(closed.is_closed());
        assert_eq!(closed.exit_price, Some(165.0));
    }

    #[test]
    fn empty_snapshot_round_trip() {
        let bytes = StorageManager::save_to_bytes(&DashboardSnapshot::default()).unwrap();
        let restored = StorageManager::load_from_bytes(&bytes).unwrap();
        assert!(restored.picks.is_empty());
        assert!(restored.watchlist.is_empty());
        assert!(restored.rate_limit.is_none());
    }

    #[test]
    fn corrupted_payload() {
        let bytes = format::write_file(CURRENT_VERSION, &[0xFF; 3]);
        assert!(matches!(
            StorageManager::load_from_bytes(&bytes),
            Err(CoreError::Deserialization(_))
        ));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.bbds");
        let snapshot = sample_snapshot();

        StorageManager::save_to_file(&snapshot, &path).unwrap();
        let restored = StorageManager::load_from_file(&path).unwrap();
        assert_eq!(restored.watchlist, snapshot.watchlist);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = StorageManager::load_from_file(dir.path().join("nope.bbds")).unwrap_err();
        assert!(matches!(err, CoreError::FileIO(_)));
    }
}
