use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analysis::BUCKET_WIDTH_PX;
use crate::chart::{Padding, DRAG_SPEED_FACTOR};
use crate::data::{FeeTiers, Token};
use crate::selector::{LiquiditySelector, AXIS_EXTENT_FACTOR};
use crate::utils::PRICE_SIGNIFICANT_DIGITS;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub chart: ChartConfig,
    pub drag: DragConfig,
    pub market: MarketConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    pub bucket_width_px: f64,
    pub horizontal_padding: f64,
    pub vertical_padding: f64,
    pub axis_extent_factor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragConfig {
    pub speed_factor: f64,
    pub price_significant_digits: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Used when the snapshot carries no price
    #[serde(with = "rust_decimal::serde::str")]
    pub current_price: Decimal,
    pub fee_tiers: FeeTiers,
    pub token_a: Token,
    pub token_b: Token,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub snapshot_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        let padding = Padding::default();
        Self {
            chart: ChartConfig {
                bucket_width_px: BUCKET_WIDTH_PX,
                horizontal_padding: padding.horizontal,
                vertical_padding: padding.vertical,
                axis_extent_factor: AXIS_EXTENT_FACTOR,
            },
            drag: DragConfig {
                speed_factor: DRAG_SPEED_FACTOR,
                price_significant_digits: PRICE_SIGNIFICANT_DIGITS,
            },
            market: MarketConfig {
                current_price: Decimal::ONE,
                fee_tiers: FeeTiers::default(),
                token_a: Token::new("ibc/usdc", "USDC"),
                token_b: Token::new("uatom", "ATOM"),
            },
            data: DataConfig {
                snapshot_path: Some(PathBuf::from("ticks.json")),
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
            },
        }
    }
}

impl Settings {
    pub fn new() -> anyhow::Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Read settings from `path`, writing the defaults there if it does not exist yet
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| anyhow::anyhow!("Config parse error: {}", e)),
            Err(_) => {
                let default_settings = Settings::default();
                let toml_content = toml::to_string_pretty(&default_settings)?;
                std::fs::write(path, toml_content)?;
                tracing::info!("Wrote default config to {:?}", path);
                Ok(default_settings)
            }
        }
    }

    pub fn padding(&self) -> Padding {
        Padding {
            horizontal: self.chart.horizontal_padding,
            vertical: self.chart.vertical_padding,
        }
    }

    pub fn selector(&self) -> LiquiditySelector {
        LiquiditySelector::new(
            self.market.fee_tiers.clone(),
            self.chart.bucket_width_px,
            self.padding(),
            self.chart.axis_extent_factor,
        )
    }

    /// Max level for the tracing subscriber; unknown names fall back to DEBUG
    pub fn log_level(&self) -> tracing::Level {
        self.logging.level.parse().unwrap_or(tracing::Level::DEBUG)
    }
}
