mod order;
mod select;
mod types;

pub use types::{DateWindow, SelectionMode, ShiftError, ShiftRequest, ShiftedActivity, SortOrder};

use crate::directory::ActivityDirectory;
use crate::model::{Activity, ActivityId, CourseId, CourseModule};
use crate::storage::{ModuleStore, ModuleUpdate, StoreError};
use std::collections::HashSet;
use tracing::{debug, info};

/// Annuaire et stockage fournis séparément par l'hôte.
#[derive(Debug)]
pub struct SplitHost<D, S> {
    pub directory: D,
    pub store: S,
}

impl<D: ActivityDirectory, S> ActivityDirectory for SplitHost<D, S> {
    fn activities(&self, course: CourseId) -> Result<Vec<Activity>, StoreError> {
        self.directory.activities(course)
    }
}

impl<D, S: ModuleStore> ModuleStore for SplitHost<D, S> {
    fn read_module(&self, id: ActivityId) -> Result<Option<CourseModule>, StoreError> {
        self.store.read_module(id)
    }
    fn update_module(&mut self, id: ActivityId, fields: &ModuleUpdate) -> Result<(), StoreError> {
        self.store.update_module(id, fields)
    }
}

/// Shifter : décale les dates d'achèvement attendues des activités d'un cours.
///
/// Sans état entre deux demandes ; tout passe par `host`.
#[derive(Debug)]
pub struct Shifter<H> {
    host: H,
}

impl<H: ActivityDirectory> Shifter<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn into_inner(self) -> H {
        self.host
    }

    fn activities(&self, course: CourseId, sort: SortOrder) -> Result<Vec<Activity>, ShiftError> {
        let mut activities = self.host.activities(course)?;
        order::sort_activities(&mut activities, sort);
        Ok(activities)
    }

    /// Activités visibles et datées du cours, éventuellement limitées à `window`.
    /// Lecture seule.
    pub fn list_qualifying(
        &self,
        course: CourseId,
        window: Option<DateWindow>,
        sort: SortOrder,
    ) -> Result<Vec<Activity>, ShiftError> {
        let mut out = self.activities(course, sort)?;
        out.retain(|a| {
            a.visible && a.has_due_date() && select::in_window(window.as_ref(), a.expected)
        });
        Ok(out)
    }

    /// Activités proposées pour une sélection manuelle : toutes les activités
    /// datées, visibles ou non, éventuellement limitées à `window`.
    pub fn selection_candidates(
        &self,
        course: CourseId,
        window: Option<DateWindow>,
        sort: SortOrder,
    ) -> Result<Vec<Activity>, ShiftError> {
        let mut out = self.activities(course, sort)?;
        out.retain(|a| a.has_due_date() && select::in_window(window.as_ref(), a.expected));
        Ok(out)
    }
}

impl<H: ActivityDirectory + ModuleStore> Shifter<H> {
    /// Applique `request` : une lecture puis une écriture par activité retenue.
    ///
    /// Les activités absentes du stockage sont ignorées. Une erreur de stockage
    /// interrompt le traitement ; les activités déjà écrites le restent.
    pub fn compute_shift(
        &mut self,
        course: CourseId,
        request: &ShiftRequest,
        sort: SortOrder,
    ) -> Result<Vec<ShiftedActivity>, ShiftError> {
        let activities = self.activities(course, sort)?;
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for activity in activities {
            if !select::qualifies(activity.id, activity.expected, &request.mode) {
                continue;
            }
            if !seen.insert(activity.id) {
                continue;
            }
            let Some(record) = self.host.read_module(activity.id)? else {
                debug!(activity = %activity.id, "not in store, skipped");
                continue;
            };
            let old_due = record.completion_expected;
            if !select::qualifies(record.id, old_due, &request.mode) {
                continue;
            }
            let new_due = request.offset.apply(old_due).ok_or(ShiftError::TimestampOverflow {
                id: activity.id,
                expected: old_due,
                offset: request.offset.seconds(),
            })?;
            self.host
                .update_module(activity.id, &ModuleUpdate::completion_expected(new_due))?;
            debug!(activity = %activity.id, old_due, new_due, "completion date moved");

            out.push(ShiftedActivity {
                id: activity.id,
                name: activity.name,
                section: activity.section,
                old_due,
                new_due,
            });
        }

        info!(course = %course, offset = %request.offset, moved = out.len(), "shift applied");
        Ok(out)
    }
}
