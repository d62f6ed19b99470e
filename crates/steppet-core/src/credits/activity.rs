//! Activity classes, boost tiers, subscription tiers and credit packages.
//!
//! These are policy constants, not ledger state. Each activity class maps to
//! exactly one [`BoostTier`], and each tier carries a fixed credit price and
//! health boost.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Pricing tier of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostTier {
    Minigame,
    PetActivity,
}

impl BoostTier {
    pub const ALL: [BoostTier; 2] = [BoostTier::Minigame, BoostTier::PetActivity];

    /// Credits debited per play.
    pub const fn cost(self) -> u32 {
        match self {
            BoostTier::Minigame => 1,
            BoostTier::PetActivity => 3,
        }
    }

    /// Health added per play.
    pub const fn boost(self) -> u32 {
        match self {
            BoostTier::Minigame => 10,
            BoostTier::PetActivity => 30,
        }
    }

    /// The largest single spend the ledger accepts.
    pub fn max_cost() -> u32 {
        Self::ALL.iter().map(|t| t.cost()).max().unwrap_or(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Minigame {
    TreatCatch,
    MemoryMatch,
    BubblePop,
    PatternMatch,
    SkyDash,
}

impl Minigame {
    pub const ALL: [Minigame; 5] = [
        Minigame::TreatCatch,
        Minigame::MemoryMatch,
        Minigame::BubblePop,
        Minigame::PatternMatch,
        Minigame::SkyDash,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetActivity {
    Feed,
    PlayBall,
    WatchTv,
}

impl PetActivity {
    pub const ALL: [PetActivity; 3] = [PetActivity::Feed, PetActivity::PlayBall, PetActivity::WatchTv];
}

/// Something a credit can be spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum ActivityClass {
    Minigame(Minigame),
    PetActivity(PetActivity),
}

impl ActivityClass {
    pub const fn tier(self) -> BoostTier {
        match self {
            ActivityClass::Minigame(_) => BoostTier::Minigame,
            ActivityClass::PetActivity(_) => BoostTier::PetActivity,
        }
    }

    pub const fn cost(self) -> u32 {
        self.tier().cost()
    }

    pub const fn boost(self) -> u32 {
        self.tier().boost()
    }

    /// Stable kebab-case name, e.g. `treat-catch` or `play-ball`.
    pub fn name(self) -> &'static str {
        match self {
            ActivityClass::Minigame(Minigame::TreatCatch) => "treat-catch",
            ActivityClass::Minigame(Minigame::MemoryMatch) => "memory-match",
            ActivityClass::Minigame(Minigame::BubblePop) => "bubble-pop",
            ActivityClass::Minigame(Minigame::PatternMatch) => "pattern-match",
            ActivityClass::Minigame(Minigame::SkyDash) => "sky-dash",
            ActivityClass::PetActivity(PetActivity::Feed) => "feed",
            ActivityClass::PetActivity(PetActivity::PlayBall) => "play-ball",
            ActivityClass::PetActivity(PetActivity::WatchTv) => "watch-tv",
        }
    }

    pub fn all() -> impl Iterator<Item = ActivityClass> {
        Minigame::ALL
            .into_iter()
            .map(ActivityClass::Minigame)
            .chain(PetActivity::ALL.into_iter().map(ActivityClass::PetActivity))
    }
}

impl std::str::FromStr for ActivityClass {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        ActivityClass::all()
            .find(|a| a.name() == normalized)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "activity".into(),
                message: format!("unknown activity '{s}'"),
            })
    }
}

impl std::fmt::Display for ActivityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Subscription tier, which sets the daily free credit allotment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    #[default]
    Base,
    Premium,
}

impl SubscriptionTier {
    pub const fn daily_free_cap(self) -> u32 {
        match self {
            SubscriptionTier::Base => 5,
            SubscriptionTier::Premium => 10,
        }
    }
}

impl std::str::FromStr for SubscriptionTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" | "free" => Ok(SubscriptionTier::Base),
            "premium" => Ok(SubscriptionTier::Premium),
            other => Err(ValidationError::InvalidValue {
                field: "tier".into(),
                message: format!("unknown tier '{other}'"),
            }),
        }
    }
}

/// A purchasable bundle of durable credits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreditPackage {
    pub product_id: &'static str,
    pub credits: u32,
}

impl CreditPackage {
    pub const ALL: [CreditPackage; 3] = [
        CreditPackage {
            product_id: "virtupet_credits_5",
            credits: 5,
        },
        CreditPackage {
            product_id: "virtupet_credits_10",
            credits: 10,
        },
        CreditPackage {
            product_id: "virtupet_credits_25",
            credits: 25,
        },
    ];

    pub fn by_product_id(product_id: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|p| p.product_id == product_id)
            .ok_or_else(|| ValidationError::UnknownProduct(product_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_have_fixed_prices() {
        assert_eq!(ActivityClass::Minigame(Minigame::SkyDash).cost(), 1);
        assert_eq!(ActivityClass::Minigame(Minigame::SkyDash).boost(), 10);
        assert_eq!(ActivityClass::PetActivity(PetActivity::Feed).cost(), 3);
        assert_eq!(ActivityClass::PetActivity(PetActivity::Feed).boost(), 30);
        assert_eq!(BoostTier::max_cost(), 3);
    }

    #[test]
    fn activity_names_round_trip() {
        for activity in ActivityClass::all() {
            let parsed: ActivityClass = activity.name().parse().unwrap();
            assert_eq!(parsed, activity);
        }
        assert_eq!(
            "Play_Ball".parse::<ActivityClass>().unwrap(),
            ActivityClass::PetActivity(PetActivity::PlayBall)
        );
        assert!("juggle".parse::<ActivityClass>().is_err());
    }

    #[test]
    fn tier_caps() {
        assert_eq!(SubscriptionTier::Base.daily_free_cap(), 5);
        assert_eq!(SubscriptionTier::Premium.daily_free_cap(), 10);
        assert_eq!("premium".parse::<SubscriptionTier>().unwrap(), SubscriptionTier::Premium);
    }

    #[test]
    fn packages_resolve_by_product_id() {
        assert_eq!(CreditPackage::by_product_id("virtupet_credits_10").unwrap().credits, 10);
        assert_eq!(
            CreditPackage::by_product_id("nope"),
            Err(ValidationError::UnknownProduct("nope".into()))
        );
    }
}
