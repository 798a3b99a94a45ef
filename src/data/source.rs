use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::{RawTick, Tick, UserTicks};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read tick snapshot {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write tick snapshot {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed tick snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Everything the selector needs from upstream collaborators, captured in one file
#[derive(Debug, Clone, Default, Serialize)]
pub struct TickSnapshot {
    pub ticks: Vec<RawTick>,
    pub user_ticks: UserTicks,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub current_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

/// Wire form: ticks stay untyped so one bad entry does not reject the file
#[derive(Debug, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    ticks: Vec<serde_json::Value>,
    #[serde(default)]
    user_ticks: UserTicks,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    current_price: Option<Decimal>,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
}

pub fn parse_snapshot(json: &str) -> SourceResult<TickSnapshot> {
    let file: SnapshotFile = serde_json::from_str(json)?;

    let total = file.ticks.len();
    let ticks: Vec<RawTick> = file
        .ticks
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value::<RawTick>(value) {
            Ok(tick) if tick.reserve0.is_sign_negative() || tick.reserve1.is_sign_negative() => {
                warn!("Skipping tick {} with negative reserves", i);
                None
            }
            Ok(tick) => Some(tick),
            Err(e) => {
                warn!("Skipping malformed tick {}: {}", i, e);
                None
            }
        })
        .collect();

    if ticks.len() < total {
        warn!("Loaded {} of {} ticks", ticks.len(), total);
    }

    Ok(TickSnapshot {
        ticks,
        user_ticks: file.user_ticks,
        current_price: file.current_price,
        saved_at: file.saved_at,
    })
}

pub fn load_snapshot(path: &Path) -> SourceResult<TickSnapshot> {
    let contents = fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot = parse_snapshot(&contents)?;
    match snapshot.saved_at {
        Some(saved_at) => info!("Loaded {} ticks from {:?} (saved {})", snapshot.ticks.len(), path, saved_at),
        None => info!("Loaded {} ticks from {:?}", snapshot.ticks.len(), path),
    }
    Ok(snapshot)
}

pub fn save_snapshot(path: &Path, snapshot: &TickSnapshot) -> SourceResult<()> {
    let contents = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, contents).map_err(|source| SourceError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Saved tick snapshot to {:?}", path);
    Ok(())
}

impl TickSnapshot {
    pub fn present_user_ticks(&self) -> impl Iterator<Item = &Tick> {
        self.user_ticks.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tick::test_support::*;
    use rust_decimal_macros::dec;

    const SNAPSHOT: &str = r#"{
        "current_price": "1.02",
        "ticks": [
            {
                "token0": { "address": "ibc/usdc", "symbol": "USDC" },
                "token1": { "address": "uatom", "symbol": "ATOM" },
                "reserve0": "150.5", "reserve1": "0",
                "tick_index": 100, "price": "1.01", "fee": "0.0005", "fee_index": 1
            },
            {
                "token0": { "address": "ibc/usdc", "symbol": "USDC" },
                "token1": { "address": "uatom", "symbol": "ATOM" },
                "reserve0": "NaN", "reserve1": "0",
                "tick_index": 200, "price": "1.02", "fee": "0.0005", "fee_index": 1
            },
            {
                "token0": { "address": "ibc/usdc", "symbol": "USDC" },
                "token1": { "address": "uatom", "symbol": "ATOM" },
                "reserve0": "-3", "reserve1": "0",
                "tick_index": 300, "price": "1.03", "fee": "0.0005", "fee_index": 1
            }
        ],
        "user_ticks": [null]
    }"#;

    #[test]
    fn test_parse_skips_bad_ticks() {
        let snapshot = parse_snapshot(SNAPSHOT).unwrap();
        assert_eq!(snapshot.ticks.len(), 1);
        assert_eq!(snapshot.ticks[0].reserve0, dec!(150.5));
        assert_eq!(snapshot.current_price, Some(dec!(1.02)));
        assert_eq!(snapshot.user_ticks.len(), 1);
        assert_eq!(snapshot.present_user_ticks().count(), 0);
    }

    #[test]
    fn test_parse_empty_object() {
        let snapshot = parse_snapshot("{}").unwrap();
        assert!(snapshot.ticks.is_empty());
        assert!(snapshot.current_price.is_none());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_snapshot("not json"), Err(SourceError::Json(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_snapshot(Path::new("/nonexistent/ticks.json"));
        assert!(matches!(result, Err(SourceError::Read { .. })));
    }

    #[test]
    fn test_serialized_snapshot_parses_back() {
        let snapshot = TickSnapshot {
            ticks: vec![raw_tick(dec!(0.9), dec!(4), dec!(0), 1)],
            user_ticks: vec![Some(tick(dec!(1.2), dec!(0), dec!(8))), None],
            current_price: Some(dec!(1)),
            saved_at: Some(Utc::now()),
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed = parse_snapshot(&json).unwrap();
        assert_eq!(parsed.ticks, snapshot.ticks);
        assert_eq!(parsed.user_ticks, snapshot.user_ticks);
        assert_eq!(parsed.saved_at, snapshot.saved_at);
    }
}
