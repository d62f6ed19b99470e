//! Two-tier credit ledger.
//!
//! Free credits are granted once per day up to the tier cap and do not carry
//! over. Purchased credits are durable. Spends debit free credits first and
//! are all-or-nothing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::activity::{ActivityClass, BoostTier, SubscriptionTier};
use crate::error::{CreditError, ValidationError};

/// Persisted ledger state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditBalance {
    pub tier: SubscriptionTier,
    /// Tier change waiting for the next rollover.
    #[serde(default)]
    pub pending_tier: Option<SubscriptionTier>,
    pub daily_free_cap: u32,
    pub daily_free_remaining: u32,
    pub purchased: u32,
    pub total_used_lifetime: u64,
    pub last_reset_day: Option<NaiveDate>,
}

impl CreditBalance {
    /// A balance with a full daily allotment for `today`.
    pub fn fresh(tier: SubscriptionTier, today: NaiveDate) -> Self {
        let cap = tier.daily_free_cap();
        Self {
            tier,
            pending_tier: None,
            daily_free_cap: cap,
            daily_free_remaining: cap,
            purchased: 0,
            total_used_lifetime: 0,
            last_reset_day: Some(today),
        }
    }
}

/// How a successful debit was split across the two pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debit {
    pub from_free: u32,
    pub from_purchased: u32,
}

/// Result of a successful spend on an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendReceipt {
    pub activity: ActivityClass,
    pub cost: u32,
    pub boost_granted: u32,
    pub debit: Debit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditLedger {
    balance: CreditBalance,
}

impl CreditLedger {
    pub fn new(tier: SubscriptionTier, today: NaiveDate) -> Self {
        Self {
            balance: CreditBalance::fresh(tier, today),
        }
    }

    pub fn from_balance(mut balance: CreditBalance) -> Self {
        balance.daily_free_remaining = balance.daily_free_remaining.min(balance.daily_free_cap);
        Self { balance }
    }

    pub fn balance(&self) -> &CreditBalance {
        &self.balance
    }

    /// Free plus purchased credits.
    pub fn available_balance(&self) -> u32 {
        self.balance
            .daily_free_remaining
            .saturating_add(self.balance.purchased)
    }

    /// Refill the free pool for `today`. Returns false when already granted.
    ///
    /// A pending tier change is promoted first so the new cap applies from
    /// this grant on.
    pub fn grant_daily_allotment(&mut self, today: NaiveDate) -> bool {
        if self.balance.last_reset_day == Some(today) {
            return false;
        }
        if let Some(tier) = self.balance.pending_tier.take() {
            self.balance.tier = tier;
        }
        self.balance.daily_free_cap = self.balance.tier.daily_free_cap();
        self.balance.daily_free_remaining = self.balance.daily_free_cap;
        self.balance.last_reset_day = Some(today);
        tracing::debug!(
            day = %today,
            cap = self.balance.daily_free_cap,
            "granted daily credit allotment"
        );
        true
    }

    /// Record a tier change. It takes effect at the next daily grant.
    pub fn request_tier(&mut self, tier: SubscriptionTier) {
        self.balance.pending_tier = if tier == self.balance.tier {
            None
        } else {
            Some(tier)
        };
    }

    /// Add durable credits after a confirmed purchase.
    pub fn add_purchased(&mut self, n: u32) -> Result<u32, ValidationError> {
        if n == 0 {
            return Err(ValidationError::NonPositivePurchase);
        }
        self.balance.purchased = self.balance.purchased.saturating_add(n);
        Ok(self.balance.purchased)
    }

    /// Debit `cost` credits, free pool first. Nothing changes on error.
    pub fn debit(&mut self, cost: u32) -> Result<Debit, CreditError> {
        let max = BoostTier::max_cost();
        if cost == 0 || cost > max {
            return Err(CreditError::InvalidCost { cost, max });
        }
        let available = self.available_balance();
        if available < cost {
            return Err(CreditError::InsufficientBalance { cost, available });
        }

        let from_free = cost.min(self.balance.daily_free_remaining);
        let from_purchased = cost - from_free;
        self.balance.daily_free_remaining -= from_free;
        self.balance.purchased -= from_purchased;
        self.balance.total_used_lifetime += u64::from(cost);

        Ok(Debit {
            from_free,
            from_purchased,
        })
    }

    /// Spend the fixed price of `activity` and return its boost.
    pub fn spend(&mut self, activity: ActivityClass) -> Result<SpendReceipt, CreditError> {
        let cost = activity.cost();
        let debit = self.debit(cost)?;
        Ok(SpendReceipt {
            activity,
            cost,
            boost_granted: activity.boost(),
            debit,
        })
    }
}
