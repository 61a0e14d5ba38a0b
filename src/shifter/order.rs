use super::SortOrder;
use crate::model::Activity;

fn course_key(a: &Activity) -> (u32, usize, i64) {
    (a.section, a.position.unwrap_or(usize::MAX), a.id.get())
}

/// Tri stable selon `order` ; `AsSupplied` ne touche à rien.
pub(super) fn sort_activities(activities: &mut [Activity], order: SortOrder) {
    match order {
        SortOrder::AsSupplied => {}
        SortOrder::ByCourse => activities.sort_by_key(course_key),
        SortOrder::ByTime => activities.sort_by_key(|a| (a.expected, course_key(a))),
    }
}
