#![forbid(unsafe_code)]
//! Dexpmod — décalage en masse des dates d'achèvement attendues des activités
//! d'un cours.
//!
//! - Annuaire d'activités et table des modules derrière deux traits.
//! - Sélection : toutes les activités (fenêtre de dates optionnelle) ou une liste.
//! - Ordre de parcours explicite, jamais implicite.
//! - Catalogue JSON local, import CSV, rapports texte/CSV/JSON.

pub mod config;
pub mod directory;
pub mod io;
pub mod model;
pub mod offset;
pub mod report;
pub mod shifter;
pub mod storage;

pub use config::Settings;
pub use directory::ActivityDirectory;
pub use model::{
    Activity, ActivityId, Catalog, CompletionTracking, Course, CourseId, CourseModule, Section,
};
pub use offset::{DurationUnit, Offset};
pub use report::{
    selection_choices, ActivityListing, DateFormatter, PatternDate, SelectionChoice, ShiftReport,
};
pub use shifter::{
    DateWindow, SelectionMode, ShiftError, ShiftRequest, ShiftedActivity, Shifter, SortOrder,
    SplitHost,
};
pub use storage::{JsonStorage, ModuleStore, ModuleUpdate, Storage, StoreError};
