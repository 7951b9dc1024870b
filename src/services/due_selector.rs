use crate::entity::Subscription;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Due subscriptions keyed by owner, each list in store order
pub type DueGroups = BTreeMap<i64, Vec<Subscription>>;

/// Picks the subscriptions that should be reported in the tick taken at `now`.
///
/// Selection is read-only: a subscription whose time matches but whose interval
/// has not elapsed yet is left alone and evaluated again on a later tick.
pub fn select_due<I>(subscriptions: I, now: NaiveDateTime) -> DueGroups
where
    I: IntoIterator<Item = Subscription>,
{
    let mut groups = DueGroups::new();

    for subscription in subscriptions.into_iter().filter(|s| s.is_due(now)) {
        groups
            .entry(subscription.user_id)
            .or_default()
            .push(subscription);
    }

    groups
}

/// Number of subscriptions across all groups
pub fn due_count(groups: &DueGroups) -> usize {
    groups.values().map(Vec::len).sum()
}
