use crate::models::entry::{Entry, Retention};

/// Applies a group's retention to its already-sorted entries.
pub(super) fn prune_group(retention: Retention, entries: &mut Vec<Entry>) {
    match retention {
        Retention::All => {}
        Retention::KeepFirst(limit) => entries.truncate(limit),
        Retention::DescriptionsFor(limit) => entries
            .iter_mut()
            .skip(limit)
            .for_each(|entry| entry.details.clear_description()),
    }
}
