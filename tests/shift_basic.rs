#![forbid(unsafe_code)]
use dexpmod::{
    Activity, ActivityDirectory, ActivityId, Catalog, CompletionTracking, CourseId, CourseModule,
    DateWindow, ModuleStore, ModuleUpdate, Offset, ShiftError, ShiftRequest, Shifter, SortOrder,
    SplitHost, StoreError,
};

const COURSE: i64 = 2;

fn module(id: i64, section: u32, name: &str, expected: i64) -> CourseModule {
    CourseModule {
        id: ActivityId::new(id),
        course: CourseId::new(COURSE),
        name: name.into(),
        module: "assign".into(),
        section,
        completion: CompletionTracking::Manual,
        completion_expected: expected,
        visible: true,
        available: true,
    }
}

fn catalog(modules: Vec<CourseModule>) -> Catalog {
    let mut c = Catalog::default();
    for m in modules {
        c.upsert_module(m);
    }
    c
}

fn due(c: &Catalog, id: i64) -> i64 {
    c.find_module(ActivityId::new(id)).unwrap().completion_expected
}

fn course() -> CourseId {
    CourseId::new(COURSE)
}

fn shift_all(seconds: i64) -> ShiftRequest {
    ShiftRequest::all(Offset::from_seconds(seconds))
}

#[test]
fn all_activities_without_window() {
    // A(100), B(0), C(500), +50
    let mut c = catalog(vec![
        module(1, 1, "A", 100),
        module(2, 1, "B", 0),
        module(3, 2, "C", 500),
    ]);
    let moved = Shifter::new(&mut c)
        .compute_shift(course(), &shift_all(50), SortOrder::AsSupplied)
        .unwrap();

    let summary: Vec<(&str, i64, i64)> = moved
        .iter()
        .map(|m| (m.name.as_str(), m.old_due, m.new_due))
        .collect();
    assert_eq!(summary, vec![("A", 100, 150), ("C", 500, 550)]);
    assert_eq!(due(&c, 1), 150);
    assert_eq!(due(&c, 2), 0);
    assert_eq!(due(&c, 3), 550);
}

#[test]
fn zero_due_dates_are_never_touched() {
    let mut c = catalog(vec![module(1, 1, "A", 0), module(2, 1, "B", 0)]);
    let requests = [
        ShiftRequest::all(Offset::from_seconds(10)),
        ShiftRequest::within(Offset::from_seconds(10), DateWindow::new(-1_000, 1_000)),
        ShiftRequest::selected(Offset::from_seconds(10), [ActivityId::new(1), ActivityId::new(2)]),
    ];
    for request in &requests {
        let moved = Shifter::new(&mut c)
            .compute_shift(course(), request, SortOrder::AsSupplied)
            .unwrap();
        assert!(moved.is_empty());
    }
    assert_eq!((due(&c, 1), due(&c, 2)), (0, 0));
}

#[test]
fn window_restricts_inclusively() {
    let mut c = catalog(vec![
        module(1, 1, "early", 99),
        module(2, 1, "low", 100),
        module(3, 1, "high", 200),
        module(4, 1, "late", 201),
    ]);
    let request = ShiftRequest::within(Offset::from_seconds(-10), DateWindow::new(100, 200));
    let moved = Shifter::new(&mut c)
        .compute_shift(course(), &request, SortOrder::AsSupplied)
        .unwrap();
    assert_eq!(moved.len(), 2);
    assert_eq!(
        [due(&c, 1), due(&c, 2), due(&c, 3), due(&c, 4)],
        [99, 90, 190, 201]
    );
}

#[test]
fn inverted_window_moves_nothing() {
    let mut c = catalog(vec![module(1, 1, "A", 150)]);
    let request = ShiftRequest::within(Offset::from_seconds(10), DateWindow::new(200, 100));
    let moved = Shifter::new(&mut c)
        .compute_shift(course(), &request, SortOrder::AsSupplied)
        .unwrap();
    assert!(moved.is_empty());
    assert_eq!(due(&c, 1), 150);
}

#[test]
fn selected_activities_only() {
    let mut c = catalog(vec![
        module(1, 1, "A", 100),
        module(2, 1, "B", 200),
        module(3, 1, "C", 0),
    ]);
    let request = ShiftRequest::selected(
        Offset::from_seconds(3_600),
        [ActivityId::new(2), ActivityId::new(3), ActivityId::new(404)],
    );
    let moved = Shifter::new(&mut c)
        .compute_shift(course(), &request, SortOrder::AsSupplied)
        .unwrap();
    assert_eq!(moved.len(), 1);
    assert_eq!(moved[0].id, ActivityId::new(2));
    assert_eq!([due(&c, 1), due(&c, 2), due(&c, 3)], [100, 3_800, 0]);
}

#[test]
fn zero_offset_is_idempotent() {
    let mut c = catalog(vec![module(1, 1, "A", 100), module(2, 2, "B", 700)]);
    let before = c.clone();
    Shifter::new(&mut c)
        .compute_shift(course(), &ShiftRequest::all(Offset::default()), SortOrder::ByTime)
        .unwrap();
    assert_eq!(c.modules, before.modules);
}

#[test]
fn negative_results_are_accepted() {
    let mut c = catalog(vec![module(1, 1, "A", 100)]);
    Shifter::new(&mut c)
        .compute_shift(course(), &shift_all(-500), SortOrder::AsSupplied)
        .unwrap();
    assert_eq!(due(&c, 1), -400);
}

#[test]
fn hidden_activities_are_moved_but_not_listed() {
    let mut hidden = module(1, 1, "hidden", 100);
    hidden.visible = false;
    let mut c = catalog(vec![hidden, module(2, 1, "shown", 100)]);

    let listed = Shifter::new(&c)
        .list_qualifying(course(), None, SortOrder::AsSupplied)
        .unwrap();
    assert_eq!(listed.len(), 1);
    let candidates = Shifter::new(&c)
        .selection_candidates(course(), None, SortOrder::AsSupplied)
        .unwrap();
    assert_eq!(candidates.len(), 2);

    let moved = Shifter::new(&mut c)
        .compute_shift(course(), &shift_all(1), SortOrder::AsSupplied)
        .unwrap();
    assert_eq!(moved.len(), 2);
}

#[test]
fn untracked_modules_are_invisible_to_the_shifter() {
    let mut untracked = module(1, 1, "page", 100);
    untracked.completion = CompletionTracking::None;
    let mut c = catalog(vec![untracked]);
    let moved = Shifter::new(&mut c)
        .compute_shift(course(), &shift_all(1), SortOrder::AsSupplied)
        .unwrap();
    assert!(moved.is_empty());
    assert_eq!(due(&c, 1), 100);
}

#[test]
fn listing_window_and_sort_orders() {
    let c = catalog(vec![
        module(5, 2, "late in s2", 300),
        module(6, 1, "s1 first", 500),
        module(7, 1, "s1 second", 100),
        module(8, 3, "outside", 900),
    ]);
    let shifter = Shifter::new(&c);
    let names = |order: SortOrder, window: Option<DateWindow>| -> Vec<String> {
        shifter
            .list_qualifying(course(), window, order)
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect()
    };

    assert_eq!(
        names(SortOrder::AsSupplied, None),
        ["s1 first", "s1 second", "late in s2", "outside"]
    );
    assert_eq!(
        names(SortOrder::ByCourse, None),
        ["s1 first", "s1 second", "late in s2", "outside"]
    );
    assert_eq!(
        names(SortOrder::ByTime, Some(DateWindow::new(0, 500))),
        ["s1 second", "late in s2", "s1 first"]
    );
}

#[test]
fn catalog_supplies_course_order_whatever_the_import_order() {
    let c = catalog(vec![
        module(1, 3, "s3", 100),
        module(2, 1, "s1", 100),
        module(3, 2, "s2", 100),
    ]);
    let sections: Vec<u32> = Shifter::new(&c)
        .list_qualifying(course(), None, SortOrder::AsSupplied)
        .unwrap()
        .iter()
        .map(|a| a.section)
        .collect();
    assert_eq!(sections, [1, 2, 3]);
}

#[test]
fn result_follows_requested_order() {
    let mut c = catalog(vec![module(1, 2, "second", 10), module(2, 1, "first", 20)]);
    let moved = Shifter::new(&mut c)
        .compute_shift(course(), &shift_all(1), SortOrder::ByCourse)
        .unwrap();
    let names: Vec<&str> = moved.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["first", "second"]);
}

/// Annuaire figé, indépendant du stockage.
struct FixedDirectory(Vec<Activity>);

impl ActivityDirectory for FixedDirectory {
    fn activities(&self, _course: CourseId) -> Result<Vec<Activity>, StoreError> {
        Ok(self.0.clone())
    }
}

fn listed(id: i64, expected: i64) -> Activity {
    Activity {
        id: ActivityId::new(id),
        name: format!("a{id}"),
        module: "quiz".into(),
        section: 1,
        position: None,
        expected,
        visible: true,
        available: true,
    }
}

#[test]
fn as_supplied_keeps_directory_order() {
    let host = SplitHost {
        directory: FixedDirectory(vec![listed(3, 300), listed(1, 100), listed(2, 200)]),
        store: catalog(vec![]),
    };
    let ids: Vec<i64> = Shifter::new(&host)
        .list_qualifying(course(), None, SortOrder::AsSupplied)
        .unwrap()
        .iter()
        .map(|a| a.id.get())
        .collect();
    assert_eq!(ids, [3, 1, 2]);
}

#[test]
fn directory_entries_missing_from_store_are_skipped() {
    let host = SplitHost {
        directory: FixedDirectory(vec![listed(1, 100), listed(2, 100)]),
        store: catalog(vec![module(2, 1, "a2", 100)]),
    };
    let mut shifter = Shifter::new(host);
    let moved = shifter
        .compute_shift(course(), &shift_all(5), SortOrder::AsSupplied)
        .unwrap();
    assert_eq!(moved.len(), 1);
    assert_eq!(due(&shifter.into_inner().store, 2), 105);
}

#[test]
fn duplicate_directory_entries_move_once() {
    let host = SplitHost {
        directory: FixedDirectory(vec![listed(1, 100), listed(1, 100)]),
        store: catalog(vec![module(1, 1, "a1", 100)]),
    };
    let mut shifter = Shifter::new(host);
    let moved = shifter
        .compute_shift(course(), &shift_all(5), SortOrder::AsSupplied)
        .unwrap();
    assert_eq!(moved.len(), 1);
    assert_eq!(due(&shifter.into_inner().store, 1), 105);
}

/// Stockage qui refuse toute écriture.
struct ReadOnlyStore(Catalog);

impl ModuleStore for ReadOnlyStore {
    fn read_module(&self, id: ActivityId) -> Result<Option<CourseModule>, StoreError> {
        self.0.read_module(id)
    }
    fn update_module(&mut self, _id: ActivityId, _fields: &ModuleUpdate) -> Result<(), StoreError> {
        Err(StoreError::Other(anyhow::anyhow!("read-only store")))
    }
}

#[test]
fn store_failures_propagate() {
    let c = catalog(vec![module(1, 1, "A", 100)]);
    let host = SplitHost {
        directory: c.clone(),
        store: ReadOnlyStore(c),
    };
    let err = Shifter::new(host)
        .compute_shift(course(), &shift_all(5), SortOrder::AsSupplied)
        .unwrap_err();
    assert!(matches!(err, ShiftError::Store(StoreError::Other(_))));
}

#[test]
fn overflow_stops_before_writing() {
    let mut c = catalog(vec![module(1, 1, "A", i64::MAX - 1)]);
    let err = Shifter::new(&mut c)
        .compute_shift(course(), &shift_all(10), SortOrder::AsSupplied)
        .unwrap_err();
    assert!(matches!(err, ShiftError::TimestampOverflow { .. }));
    assert_eq!(due(&c, 1), i64::MAX - 1);
}
