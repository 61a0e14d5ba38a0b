use crate::model::{Activity, Catalog, CourseId, CourseModule};
use crate::storage::StoreError;
use std::collections::HashSet;

/// Annuaire des activités d'un cours (équivalent du `modinfo` de l'hôte).
pub trait ActivityDirectory {
    /// Activités dont le suivi d'achèvement est actif, dans l'ordre de l'annuaire.
    fn activities(&self, course: CourseId) -> Result<Vec<Activity>, StoreError>;
}

impl<T: ActivityDirectory + ?Sized> ActivityDirectory for &T {
    fn activities(&self, course: CourseId) -> Result<Vec<Activity>, StoreError> {
        (**self).activities(course)
    }
}

impl<T: ActivityDirectory + ?Sized> ActivityDirectory for &mut T {
    fn activities(&self, course: CourseId) -> Result<Vec<Activity>, StoreError> {
        (**self).activities(course)
    }
}

impl ActivityDirectory for Catalog {
    /// Ordre du cours : sections par numéro, puis séquence de chaque section ;
    /// les modules absents de la mise en page suivent, dans l'ordre de la table.
    fn activities(&self, course: CourseId) -> Result<Vec<Activity>, StoreError> {
        let mut out = Vec::new();
        let mut placed = HashSet::new();

        if let Some(layout) = self.find_course(course) {
            let mut sections: Vec<_> = layout.sections.iter().collect();
            sections.sort_by_key(|s| s.number);
            for section in sections {
                for (position, id) in section.sequence.iter().enumerate() {
                    let Some(m) = self.find_module(*id) else {
                        continue;
                    };
                    if m.course != course || m.section != section.number || !placed.insert(m.id) {
                        continue;
                    }
                    if m.completion.is_tracked() {
                        out.push(to_activity(m, Some(position)));
                    }
                }
            }
        }

        out.extend(
            self.modules
                .iter()
                .filter(|m| m.course == course && m.completion.is_tracked())
                .filter(|m| !placed.contains(&m.id))
                .map(|m| to_activity(m, None)),
        );
        Ok(out)
    }
}

fn to_activity(m: &CourseModule, position: Option<usize>) -> Activity {
    Activity {
        id: m.id,
        name: m.name.clone(),
        module: m.module.clone(),
        section: m.section,
        position,
        expected: m.completion_expected,
        visible: m.visible,
        available: m.available,
    }
}
