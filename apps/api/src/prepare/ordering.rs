use std::cmp::Ordering;

use crate::models::entry::{Entry, SortRule};

/// Orders one group in place. Sorting is stable, so ties keep input order.
pub(super) fn sort_group(rule: SortRule, entries: &mut [Entry]) {
    match rule {
        SortRule::Input => {}
        SortRule::ByProficiency => entries.sort_by(by_proficiency_desc),
        // `EndDate::Present` is the greatest value, so descending puts it first.
        SortRule::ByEndDate => entries.sort_by(|a, b| b.ends.cmp(&a.ends)),
    }
}

fn by_proficiency_desc(a: &Entry, b: &Entry) -> Ordering {
    let level = |e: &Entry| e.proficiency().unwrap_or(f64::NEG_INFINITY);
    level(b).total_cmp(&level(a))
}
