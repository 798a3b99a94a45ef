use rust_decimal::Decimal;
use tracing::debug;

use super::{FeeTiers, RawTick, Tick, TickGroup, Token};
use crate::utils::inverse;

/// Express a raw tick relative to tokenA.
///
/// Returns `None` for ticks without liquidity, ticks from another pair, and reversed
/// ticks whose price has no inverse.
pub fn normalize_tick(raw: &RawTick, token_a: &Token, token_b: &Token) -> Option<Tick> {
    if raw.reserve0.is_zero() && raw.reserve1.is_zero() {
        return None;
    }

    let forward = raw.token0 == *token_a && raw.token1 == *token_b;
    let reverse = raw.token0 == *token_b && raw.token1 == *token_a;

    if forward {
        Some(Tick {
            tick_index: raw.tick_index,
            price: raw.price,
            reserve_a: raw.reserve0,
            reserve_b: raw.reserve1,
            fee: raw.fee,
            fee_index: raw.fee_index,
            token_a: raw.token0.clone(),
            token_b: raw.token1.clone(),
        })
    } else if reverse {
        let price = inverse(raw.price)?;
        Some(Tick {
            tick_index: -raw.tick_index,
            price,
            reserve_a: raw.reserve1,
            reserve_b: raw.reserve0,
            fee: raw.fee,
            fee_index: raw.fee_index,
            token_a: raw.token1.clone(),
            token_b: raw.token0.clone(),
        })
    } else {
        None
    }
}

/// Canonicalize an indexer tick list into tokenA/tokenB orientation
pub fn normalize_ticks(raw_ticks: &[RawTick], token_a: &Token, token_b: &Token) -> TickGroup {
    let ticks: TickGroup = raw_ticks
        .iter()
        .filter_map(|raw| normalize_tick(raw, token_a, token_b))
        .collect();

    if ticks.len() != raw_ticks.len() {
        debug!(
            "Normalized {} of {} ticks for {}/{}",
            ticks.len(),
            raw_ticks.len(),
            token_a.symbol,
            token_b.symbol
        );
    }

    ticks
}

/// Keep ticks of the requested fee tier; no tier keeps everything
pub fn filter_fee_tier(ticks: &[Tick], fee_tier: Option<Decimal>, fee_tiers: &FeeTiers) -> TickGroup {
    match fee_tier {
        None => ticks.to_vec(),
        Some(requested) => ticks
            .iter()
            .filter(|tick| fee_tiers.matches(tick.fee_index, requested))
            .cloned()
            .collect(),
    }
}

impl From<&Tick> for RawTick {
    /// Forward-oriented raw form of a normalized tick
    fn from(tick: &Tick) -> Self {
        RawTick {
            token0: tick.token_a.clone(),
            token1: tick.token_b.clone(),
            reserve0: tick.reserve_a,
            reserve1: tick.reserve_b,
            tick_index: tick.tick_index,
            price: tick.price,
            fee: tick.fee,
            fee_index: tick.fee_index,
        }
    }
}
