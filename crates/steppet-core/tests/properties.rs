//! Property tests for progression invariants.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use steppet_core::credits::{CreditLedger, Minigame, PetActivity};
use steppet_core::vitality::compute_health;
use steppet_core::{
    ActivityClass, EngineSettings, EngineSnapshot, MemoryStore, ProgressionCoordinator,
    SubscriptionTier,
};

fn day(n: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + Duration::days(n)
}

fn activity() -> impl Strategy<Value = ActivityClass> {
    prop_oneof![
        prop::sample::select(Minigame::ALL.to_vec()).prop_map(ActivityClass::Minigame),
        prop::sample::select(PetActivity::ALL.to_vec()).prop_map(ActivityClass::PetActivity),
    ]
}

#[derive(Debug, Clone)]
enum Action {
    Steps(u32),
    Spend(ActivityClass),
    Purchase(u32),
    Goal(u32),
    NextDay(u8),
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (0u32..30_000).prop_map(Action::Steps),
        3 => activity().prop_map(Action::Spend),
        1 => (1u32..10).prop_map(Action::Purchase),
        1 => (1u32..20_000).prop_map(Action::Goal),
        2 => (1u8..4).prop_map(Action::NextDay),
    ]
}

proptest! {
    #[test]
    fn health_stays_in_bounds(steps in any::<u32>(), goal in any::<u32>(), boost in any::<u32>()) {
        let (health, _) = compute_health(steps, goal, boost);
        prop_assert!(health <= 100);
        let (without_boost, _) = compute_health(steps, goal, 0);
        prop_assert!(health >= without_boost);
    }

    #[test]
    fn ledger_never_goes_negative_and_conserves_credits(
        purchased in 0u32..20,
        costs in prop::collection::vec(0u32..5, 0..30),
    ) {
        let mut ledger = CreditLedger::new(SubscriptionTier::Base, day(0));
        if purchased > 0 {
            ledger.add_purchased(purchased).unwrap();
        }
        let start = ledger.available_balance();
        let mut spent = 0u32;
        for cost in costs {
            let before = ledger.balance().clone();
            match ledger.debit(cost) {
                Ok(debit) => {
                    prop_assert_eq!(debit.from_free + debit.from_purchased, cost);
                    spent += cost;
                }
                Err(_) => prop_assert_eq!(ledger.balance(), &before),
            }
        }
        prop_assert_eq!(ledger.available_balance() + spent, start);
        prop_assert_eq!(ledger.balance().total_used_lifetime, u64::from(spent));
    }

    #[test]
    fn engine_invariants_hold_for_any_sequence(actions in prop::collection::vec(action(), 1..60)) {
        let (mut c, _) = ProgressionCoordinator::open(
            Box::new(MemoryStore::new()),
            EngineSettings::default(),
            day(0),
        );
        let mut today = day(0);
        let mut longest = 0;
        let mut unlocked = 0;

        for action in actions {
            match action {
                Action::Steps(n) => {
                    c.record_steps(today, n);
                }
                Action::Spend(activity) => {
                    let _ = c.spend_credit(activity);
                }
                Action::Purchase(n) => {
                    c.add_purchased_credits(n).unwrap();
                }
                Action::Goal(n) => {
                    c.request_goal_change(n).unwrap();
                }
                Action::NextDay(n) => {
                    today += Duration::days(i64::from(n));
                    prop_assert!(c.check_rollover(today).is_some());
                    let rolled = c.snapshot();
                    c.drain_events();
                    prop_assert!(c.check_rollover(today).is_none());
                    let mut repeated = c.snapshot();
                    repeated.saved_at = rolled.saved_at;
                    prop_assert_eq!(repeated, rolled);
                    prop_assert!(c.drain_events().is_empty());
                }
            }

            let vitality = c.vitality();
            prop_assert!(vitality.health <= 100);
            prop_assert!(c.streak().current_streak() <= c.streak().longest_streak());
            prop_assert!(c.streak().longest_streak() >= longest);
            longest = c.streak().longest_streak();

            let credits = c.credits();
            prop_assert!(credits.daily_free_remaining <= credits.daily_free_cap);

            let now_unlocked = c.achievements().unlocked_count();
            prop_assert!(now_unlocked >= unlocked);
            unlocked = now_unlocked;
            for record in c.achievements().records() {
                prop_assert!(record.progress <= record.target_progress);
                prop_assert_eq!(record.unlocked, record.unlocked_date.is_some());
            }
        }
    }

    #[test]
    fn snapshot_restores_same_state(actions in prop::collection::vec(action(), 1..30)) {
        let (mut c, _) = ProgressionCoordinator::open(
            Box::new(MemoryStore::new()),
            EngineSettings::default(),
            day(0),
        );
        let mut today = day(0);
        for action in actions {
            match action {
                Action::Steps(n) => { c.record_steps(today, n); }
                Action::Spend(activity) => { let _ = c.spend_credit(activity); }
                Action::Purchase(n) => { c.add_purchased_credits(n).unwrap(); }
                Action::Goal(n) => { c.request_goal_change(n).unwrap(); }
                Action::NextDay(n) => {
                    today += Duration::days(i64::from(n));
                    c.check_rollover(today);
                }
            }
        }

        let saved = c.snapshot();
        let json = serde_json::to_string(&saved).unwrap();
        let decoded: EngineSnapshot = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(&decoded, &saved);

        let (restored, _) = ProgressionCoordinator::open(
            Box::new(MemoryStore::with_snapshot(decoded)),
            EngineSettings::default(),
            today,
        );
        let mut again = restored.snapshot();
        again.saved_at = saved.saved_at;
        prop_assert_eq!(again, saved);
    }
}
