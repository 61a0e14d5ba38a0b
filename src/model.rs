use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifiant fort pour un cours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(i64);

impl CourseId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifiant fort pour une activité (ligne de `course_modules`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(i64);

impl ActivityId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mode de suivi d'achèvement d'une activité.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionTracking {
    #[default]
    None,
    Manual,
    Automatic,
}

impl CompletionTracking {
    pub fn is_tracked(self) -> bool {
        self != CompletionTracking::None
    }
}

fn default_true() -> bool {
    true
}

/// Enregistrement persistant d'un module de cours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseModule {
    pub id: ActivityId,
    pub course: CourseId,
    pub name: String,
    /// Type d'activité (`assign`, `quiz`, ...)
    pub module: String,
    pub section: u32,
    #[serde(default)]
    pub completion: CompletionTracking,
    /// Timestamp Unix ; 0 = pas de date attendue
    #[serde(default)]
    pub completion_expected: i64,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub available: bool,
}

/// Section d'un cours : ordre des modules tel qu'affiché.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub number: u32,
    #[serde(default)]
    pub sequence: Vec<ActivityId>,
}

impl Section {
    pub fn position_of(&self, id: ActivityId) -> Option<usize> {
        self.sequence.iter().position(|m| *m == id)
    }
}

/// Cours
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Course {
    pub fn new<S: Into<String>>(id: CourseId, fullname: S) -> Self {
        Self {
            id,
            fullname: fullname.into(),
            sections: Vec::new(),
        }
    }

    pub fn section(&self, number: u32) -> Option<&Section> {
        self.sections.iter().find(|s| s.number == number)
    }

    /// Retourne la section demandée, créée si besoin (sections triées par numéro).
    pub fn section_mut(&mut self, number: u32) -> &mut Section {
        let pos = match self.sections.iter().position(|s| s.number == number) {
            Some(pos) => pos,
            None => {
                let at = self.sections.partition_point(|s| s.number < number);
                self.sections.insert(
                    at,
                    Section {
                        number,
                        sequence: Vec::new(),
                    },
                );
                at
            }
        };
        &mut self.sections[pos]
    }
}

/// Vue en lecture seule d'une activité, telle que fournie par l'annuaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    pub module: String,
    pub section: u32,
    /// Rang dans la séquence de la section, si connu
    pub position: Option<usize>,
    pub expected: i64,
    pub visible: bool,
    pub available: bool,
}

impl Activity {
    pub fn has_due_date(&self) -> bool {
        self.expected != 0
    }
}

/// Catalogue complet : cours + table des modules.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Catalog {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub modules: Vec<CourseModule>,
}

impl Catalog {
    pub fn find_course(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }
    pub fn find_module(&self, id: ActivityId) -> Option<&CourseModule> {
        self.modules.iter().find(|m| m.id == id)
    }
    pub fn find_module_mut(&mut self, id: ActivityId) -> Option<&mut CourseModule> {
        self.modules.iter_mut().find(|m| m.id == id)
    }

    /// Ajoute (ou remplace) un module et l'inscrit dans la séquence de sa section.
    pub fn upsert_module(&mut self, module: CourseModule) {
        for course in self.courses.iter_mut() {
            for section in course.sections.iter_mut() {
                if course.id != module.course || section.number != module.section {
                    section.sequence.retain(|id| *id != module.id);
                }
            }
        }
        let course_pos = match self.courses.iter().position(|c| c.id == module.course) {
            Some(pos) => pos,
            None => {
                self.courses.push(Course::new(module.course, ""));
                self.courses.len() - 1
            }
        };
        let section = self.courses[course_pos].section_mut(module.section);
        if section.position_of(module.id).is_none() {
            section.sequence.push(module.id);
        }

        match self.find_module_mut(module.id) {
            Some(existing) => *existing = module,
            None => self.modules.push(module),
        }
    }
}
