use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::{from_f64, price_to_tick_index, to_f64};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub address: String,
    pub symbol: String,
}

impl Token {
    pub fn new(address: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            symbol: symbol.into(),
        }
    }
}

/// Tick as reported by the indexer, in token0/token1 orientation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTick {
    pub token0: Token,
    pub token1: Token,
    #[serde(with = "rust_decimal::serde::str")]
    pub reserve0: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub reserve1: Decimal,
    pub tick_index: i64,
    /// token1 per token0
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub fee: Decimal,
    pub fee_index: usize,
}

/// Tick expressed relative to tokenA: `price` is tokenB per tokenA
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub tick_index: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub reserve_a: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub reserve_b: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub fee: Decimal,
    pub fee_index: usize,
    pub token_a: Token,
    pub token_b: Token,
}

/// Which half of the distribution a tick is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSide {
    A,
    B,
}

impl Tick {
    pub fn side(&self) -> TickSide {
        if self.reserve_a > Decimal::ZERO {
            TickSide::A
        } else {
            TickSide::B
        }
    }

    pub fn total_reserves(&self) -> Decimal {
        self.reserve_a.saturating_add(self.reserve_b)
    }

    pub fn has_liquidity(&self) -> bool {
        !self.reserve_a.is_zero() || !self.reserve_b.is_zero()
    }
}

/// Ordered ticks; display order, not necessarily price order
pub type TickGroup = Vec<Tick>;

/// User ticks keep their slot index; `None` marks a deleted tick
pub type UserTicks = Vec<Option<Tick>>;

/// Present user ticks with their slot index
pub fn present_ticks(user_ticks: &[Option<Tick>]) -> impl Iterator<Item = (usize, &Tick)> {
    user_ticks
        .iter()
        .enumerate()
        .filter_map(|(index, tick)| tick.as_ref().map(|tick| (index, tick)))
}

/// Lowest and highest price among present user ticks
pub fn user_price_bounds(user_ticks: &[Option<Tick>]) -> Option<(Decimal, Decimal)> {
    present_ticks(user_ticks).fold(None, |bounds, (_, tick)| match bounds {
        None => Some((tick.price, tick.price)),
        Some((min, max)) => Some((min.min(tick.price), max.max(tick.price))),
    })
}

/// Parameters for seeding a fresh set of user ticks across a price range
#[derive(Debug, Clone)]
pub struct UserTickSeed {
    pub token_a: Token,
    pub token_b: Token,
    pub range_min: Decimal,
    pub range_max: Decimal,
    pub count: usize,
    pub current_price: Decimal,
    pub total_a: Decimal,
    pub total_b: Decimal,
    pub fee: Decimal,
    pub fee_index: usize,
}

/// Spread `count` ticks geometrically over the range. Ticks below the current price
/// hold tokenA, ticks at or above it hold tokenB; each side's total is split evenly.
///
/// Returns no ticks when a side with liquidity would get no tick to hold it, so totals
/// are always kept.
pub fn seed_user_ticks(seed: &UserTickSeed) -> UserTicks {
    if seed.count == 0 || seed.range_min <= Decimal::ZERO || seed.range_max < seed.range_min {
        return Vec::new();
    }

    let min = to_f64(seed.range_min);
    let max = to_f64(seed.range_max);
    let steps = seed.count.saturating_sub(1).max(1) as f64;
    let ratio = (max / min).powf(1.0 / steps);

    let prices: Vec<Decimal> = (0..seed.count)
        .map(|i| {
            if i == 0 {
                seed.range_min
            } else if i + 1 == seed.count {
                seed.range_max
            } else {
                from_f64(min * ratio.powi(i as i32)).unwrap_or(seed.range_min)
            }
        })
        .collect();

    let a_count = prices.iter().filter(|p| **p < seed.current_price).count();
    let b_count = prices.len() - a_count;
    if (a_count == 0 && !seed.total_a.is_zero()) || (b_count == 0 && !seed.total_b.is_zero()) {
        return Vec::new();
    }
    let share = |total: Decimal, n: usize| {
        if n == 0 {
            Decimal::ZERO
        } else {
            total / Decimal::from(n as u64)
        }
    };
    let share_a = share(seed.total_a, a_count);
    let share_b = share(seed.total_b, b_count);

    prices
        .into_iter()
        .map(|price| {
            let below = price < seed.current_price;
            Some(Tick {
                tick_index: price_to_tick_index(price).unwrap_or_default(),
                price,
                reserve_a: if below { share_a } else { Decimal::ZERO },
                reserve_b: if below { Decimal::ZERO } else { share_b },
                fee: seed.fee,
                fee_index: seed.fee_index,
                token_a: seed.token_a.clone(),
                token_b: seed.token_b.clone(),
            })
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tick_side() {
        assert_eq!(tick(dec!(1), dec!(5), dec!(0)).side(), TickSide::A);
        assert_eq!(tick(dec!(1), dec!(0), dec!(5)).side(), TickSide::B);
        assert_eq!(tick(dec!(1), dec!(0), dec!(0)).side(), TickSide::B);
    }

    #[test]
    fn test_user_price_bounds_skips_holes() {
        let ticks = vec![
            Some(tick(dec!(1.5), dec!(1), dec!(0))),
            None,
            Some(tick(dec!(0.8), dec!(1), dec!(0))),
            Some(tick(dec!(2.2), dec!(0), dec!(1))),
        ];
        assert_eq!(user_price_bounds(&ticks), Some((dec!(0.8), dec!(2.2))));
        assert_eq!(user_price_bounds(&[None, None]), None);

        let indexes: Vec<usize> = present_ticks(&ticks).map(|(i, _)| i).collect();
        assert_eq!(indexes, vec![0, 2, 3]);
    }

    #[test]
    fn test_seed_user_ticks() {
        let seed = UserTickSeed {
            token_a: token_a(),
            token_b: token_b(),
            range_min: dec!(0.5),
            range_max: dec!(2),
            count: 4,
            current_price: dec!(1),
            total_a: dec!(100),
            total_b: dec!(50),
            fee: dec!(0.0005),
            fee_index: 1,
        };
        let ticks = seed_user_ticks(&seed);
        assert_eq!(ticks.len(), 4);

        let first = ticks[0].as_ref().unwrap();
        let last = ticks[3].as_ref().unwrap();
        assert_eq!(first.price, dec!(0.5));
        assert_eq!(last.price, dec!(2));
        assert_eq!(first.reserve_a, dec!(50));
        assert_eq!(last.reserve_b, dec!(25));

        let total_a: Decimal = ticks.iter().flatten().map(|t| t.reserve_a).sum();
        assert_eq!(total_a, dec!(100));
    }

    #[test]
    fn test_seed_keeps_both_sides_or_nothing() {
        let mut seed = UserTickSeed {
            token_a: token_a(),
            token_b: token_b(),
            range_min: dec!(0.2),
            range_max: dec!(0.5),
            count: 3,
            current_price: dec!(1),
            total_a: dec!(10),
            total_b: dec!(7),
            fee: dec!(0.0005),
            fee_index: 1,
        };
        // every tick sits below the price, nowhere to put tokenB
        assert!(seed_user_ticks(&seed).is_empty());

        seed.total_b = Decimal::ZERO;
        let ticks = seed_user_ticks(&seed);
        assert_eq!(ticks.len(), 3);
        let total_a: Decimal = ticks.iter().flatten().map(|t| t.reserve_a).sum();
        assert_eq!(total_a, dec!(10));
    }

    #[test]
    fn test_seed_user_ticks_degenerate() {
        let mut seed = UserTickSeed {
            token_a: token_a(),
            token_b: token_b(),
            range_min: dec!(2),
            range_max: dec!(1),
            count: 3,
            current_price: dec!(1),
            total_a: dec!(1),
            total_b: dec!(1),
            fee: dec!(0.0005),
            fee_index: 1,
        };
        assert!(seed_user_ticks(&seed).is_empty());
        seed.range_max = dec!(3);
        seed.count = 0;
        assert!(seed_user_ticks(&seed).is_empty());
    }
}
