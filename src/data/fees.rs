use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fee tiers indexed by a tick's `fee_index`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeTiers {
    #[serde(with = "fee_list")]
    pub tiers: Vec<Decimal>,
}

impl Default for FeeTiers {
    fn default() -> Self {
        Self {
            tiers: vec![
                Decimal::new(1, 4),  // 0.01%
                Decimal::new(5, 4),  // 0.05%
                Decimal::new(3, 3),  // 0.30%
                Decimal::new(1, 2),  // 1.00%
            ],
        }
    }
}

impl FeeTiers {
    pub fn fee_for_index(&self, fee_index: usize) -> Option<Decimal> {
        self.tiers.get(fee_index).copied()
    }

    /// A tick belongs to the requested tier when its fee index resolves to that fee
    pub fn matches(&self, fee_index: usize, requested: Decimal) -> bool {
        self.fee_for_index(fee_index) == Some(requested)
    }

    pub fn label(fee: Decimal) -> String {
        format!("{}%", (fee * Decimal::ONE_HUNDRED).round_dp(2))
    }
}

mod fee_list {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(tiers: &[Decimal], serializer: S) -> Result<S::Ok, S::Error> {
        let strings: Vec<String> = tiers.iter().map(|fee| fee.to_string()).collect();
        strings.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Decimal>, D::Error> {
        use serde::de::Error;

        let strings: Vec<String> = Vec::deserialize(deserializer)?;
        strings
            .iter()
            .map(|s| {
                s.parse::<Decimal>()
                    .map_err(|e| D::Error::custom(format!("Failed to parse fee tier {}: {}", s, e)))
            })
            .collect()
    }
}
