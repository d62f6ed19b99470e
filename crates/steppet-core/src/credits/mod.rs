mod activity;
mod ledger;

pub use activity::{
    ActivityClass, BoostTier, CreditPackage, Minigame, PetActivity, SubscriptionTier,
};
pub use ledger::{CreditBalance, CreditLedger, Debit, SpendReceipt};
