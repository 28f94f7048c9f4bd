//! The view-state engine behind the cast table.
//!
//! Everything in here is a pure function of the loaded records and a
//! [`ViewState`]: sorting, name filtering and paging never mutate the record
//! list, they produce row-index mappings into it. The model re-derives the
//! whole view after every state change instead of patching previous results.

use crate::domain::Person;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "A-Z",
            SortDirection::Descending => "Z-A",
        }
    }
}

/// The four controls that decide which slice of the records is visible.
/// Mutated only through the transition functions below; every transition is
/// total and the page is re-reconciled against the derived view afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub search_text: String,
    pub sort_direction: SortDirection,
    pub page_size: usize,
    /// 1-based page index.
    pub current_page: usize,
}

impl ViewState {
    pub fn new(default_page_size: usize) -> Self {
        ViewState {
            search_text: String::new(),
            sort_direction: SortDirection::Ascending,
            page_size: default_page_size.max(1),
            current_page: 1,
        }
    }

    /// A new filter invalidates old page offsets.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.current_page = 1;
    }

    /// Reordering keeps the page fixed.
    pub fn toggle_sort(&mut self) {
        self.sort_direction = self.sort_direction.toggled();
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.sort_direction = direction;
    }

    /// Accepts only one of the configured page sizes; anything else is
    /// ignored. Returns whether the size was applied.
    pub fn set_page_size(&mut self, size: usize, options: &[usize]) -> bool {
        if size == 0 || !options.contains(&size) {
            return false;
        }
        self.page_size = size;
        self.current_page = 1;
        true
    }

    pub fn go_to_page(&mut self, page: usize, total_pages: usize) {
        self.current_page = page.clamp(1, total_pages.max(1));
    }

    pub fn go_to_first(&mut self) {
        self.current_page = 1;
    }

    pub fn go_to_last(&mut self, total_pages: usize) {
        self.current_page = total_pages.max(1);
    }

    pub fn reset(&mut self, default_page_size: usize) {
        self.search_text.clear();
        self.sort_direction = SortDirection::Ascending;
        self.page_size = default_page_size.max(1);
        self.current_page = 1;
    }

    /// Clamp the page back into `[1, max(1, total_pages)]` after the filtered
    /// set shrank, the page size changed or the records were replaced.
    /// Without this a shrinking filter leaves the view on a phantom empty
    /// page with a live "next" control.
    pub fn reconcile(&mut self, total_pages: usize) {
        self.current_page = self.current_page.clamp(1, total_pages.max(1));
    }
}

/// Stable sort of row indices by person name. The record slice itself is
/// never reordered; equal names keep their original relative order in both
/// directions.
pub fn sort_rows(people: &[Person], direction: SortDirection) -> Vec<usize> {
    let mut rows: Vec<usize> = (0..people.len()).collect();
    match direction {
        SortDirection::Ascending => rows.sort_by(|&a, &b| people[a].name.cmp(&people[b].name)),
        SortDirection::Descending => rows.sort_by(|&a, &b| people[b].name.cmp(&people[a].name)),
    }
    rows
}

/// Keeps the rows whose name contains `search_text` case-insensitively.
/// Operates on the already-sorted mapping so the sort order survives
/// filtering. An empty search keeps every row.
pub fn filter_rows(people: &[Person], rows: &[usize], search_text: &str) -> Vec<usize> {
    if search_text.is_empty() {
        return rows.to_vec();
    }
    let needle = search_text.to_lowercase();
    rows.iter()
        .copied()
        .filter(|&idx| people[idx].name.to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice {
    /// 0-based inclusive start of the page window.
    pub start_index: usize,
    /// Exclusive end of the page window. May exceed the row count; display
    /// text clamps it, slicing clamps it.
    pub end_index: usize,
    pub total_pages: usize,
}

/// Pure page-window calculator. Does not clamp `current_page` into range,
/// reconciliation belongs to the caller.
pub fn paginate(len: usize, page_size: usize, current_page: usize) -> PageSlice {
    let page_size = page_size.max(1);
    let total_pages = len.div_ceil(page_size).max(1);
    let start_index = current_page.saturating_sub(1) * page_size;
    PageSlice {
        start_index,
        end_index: start_index + page_size,
        total_pages,
    }
}

/// The computed view: row mappings plus navigation metadata. Never stored as
/// independent truth, always recomputed from `(people, state)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView {
    pub sorted_rows: Vec<usize>,
    pub filtered_rows: Vec<usize>,
    pub visible_rows: Vec<usize>,
    pub total_filtered: usize,
    pub total_pages: usize,
    /// The page actually shown, reconciled against `total_pages`.
    pub current_page: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

/// Derivation order is sort -> filter -> paginate. The page is reconciled
/// against the post-filter page count before the visible slice is taken.
pub fn derive_view(people: &[Person], state: &ViewState) -> DerivedView {
    let sorted_rows = sort_rows(people, state.sort_direction);
    let filtered_rows = filter_rows(people, &sorted_rows, &state.search_text);
    let total_filtered = filtered_rows.len();

    let total_pages = paginate(total_filtered, state.page_size, 1).total_pages;
    let current_page = state.current_page.clamp(1, total_pages);
    let slice = paginate(total_filtered, state.page_size, current_page);

    let end = slice.end_index.min(total_filtered);
    let start = slice.start_index.min(end);
    let visible_rows = filtered_rows[start..end].to_vec();

    DerivedView {
        visible_rows,
        total_filtered,
        total_pages,
        current_page,
        start_index: slice.start_index,
        end_index: slice.end_index,
        prev_enabled: current_page > 1,
        next_enabled: slice.end_index < total_filtered,
        sorted_rows,
        filtered_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(name: &str) -> Person {
        Person {
            name: name.to_string(),
            show: "Breaking Bad".to_string(),
            actor: format!("{name} (actor)"),
            date_of_birth: "1970-01-01".to_string(),
            movie_titles: vec!["El Camino".to_string()],
        }
    }

    // 23 cast members, exactly three of which contain "an" in their name
    // (Hank Schrader, Jane Margolis, Andrea Cantillo).
    fn cast23() -> Vec<Person> {
        [
            "Walter White",
            "Skyler White",
            "Gus Fring",
            "Kim Wexler",
            "Howard Hamlin",
            "Chuck McGill",
            "Hector Torres",
            "Lalo Ortega",
            "Nacho Varga",
            "Marie Schrader",
            "Hank Schrader",
            "Todd Alquist",
            "Lydia Quayle",
            "Jane Margolis",
            "Andrea Cantillo",
            "Brock Underwood",
            "Gretchen Schwartz",
            "Elliott Schwartz",
            "Carmen Molina",
            "Steven Gomez",
            "Wendy Colby",
            "Ted Beneke",
            "Victor Reyes",
        ]
        .iter()
        .map(|name| person(name))
        .collect()
    }

    fn names(people: &[Person], rows: &[usize]) -> Vec<String> {
        rows.iter().map(|&i| people[i].name.clone()).collect()
    }

    #[test]
    fn sort_descending_is_reverse_of_ascending() {
        let people = cast23();
        let asc = sort_rows(&people, SortDirection::Ascending);
        let desc = sort_rows(&people, SortDirection::Descending);
        let mut reversed = asc.clone();
        reversed.reverse();
        assert_eq!(desc, reversed);
    }

    #[test]
    fn sort_is_idempotent() {
        let people = cast23();
        let once = sort_rows(&people, SortDirection::Ascending);
        let resorted: Vec<Person> = once.iter().map(|&i| people[i].clone()).collect();
        let twice = sort_rows(&resorted, SortDirection::Ascending);
        assert_eq!(names(&people, &once), names(&resorted, &twice));
    }

    #[test]
    fn sort_is_stable_for_equal_names() {
        let people = vec![person("Walter White"), person("Gus Fring"), person("Walter White")];
        let asc = sort_rows(&people, SortDirection::Ascending);
        assert_eq!(asc, vec![1, 0, 2]);
        let desc = sort_rows(&people, SortDirection::Descending);
        assert_eq!(desc, vec![0, 2, 1]);
    }

    #[test]
    fn sort_of_empty_input_is_empty() {
        assert!(sort_rows(&[], SortDirection::Ascending).is_empty());
    }

    #[test]
    fn filter_matches_case_insensitively() {
        let people = cast23();
        let sorted = sort_rows(&people, SortDirection::Ascending);
        for needle in ["an", "AN", "An"] {
            let hits = filter_rows(&people, &sorted, needle);
            assert_eq!(hits.len(), 3);
            for name in names(&people, &hits) {
                assert!(name.to_lowercase().contains("an"), "{name} should match");
            }
        }
    }

    #[test]
    fn empty_search_keeps_all_rows_in_order() {
        let people = cast23();
        let sorted = sort_rows(&people, SortDirection::Ascending);
        assert_eq!(filter_rows(&people, &sorted, ""), sorted);

        let view = derive_view(&people, &ViewState::new(10));
        assert_eq!(view.filtered_rows, view.sorted_rows);
    }

    #[test]
    fn filter_preserves_sort_order() {
        let people = cast23();
        let sorted = sort_rows(&people, SortDirection::Descending);
        let hits = names(&people, &filter_rows(&people, &sorted, "an"));
        assert_eq!(hits, vec!["Jane Margolis", "Hank Schrader", "Andrea Cantillo"]);
    }

    #[test]
    fn paginate_covers_all_rows_without_gaps_or_overlaps() {
        let people = cast23();
        for page_size in [1, 7, 10, 23, 50] {
            let state = ViewState::new(page_size);
            let view = derive_view(&people, &state);
            let mut collected = Vec::new();
            for page in 1..=view.total_pages {
                let mut state = state.clone();
                state.go_to_page(page, view.total_pages);
                collected.extend(derive_view(&people, &state).visible_rows);
            }
            assert_eq!(collected, view.filtered_rows, "page_size {page_size}");
        }
    }

    #[test]
    fn paginate_has_at_least_one_page_for_empty_input() {
        let slice = paginate(0, 10, 1);
        assert_eq!(slice.total_pages, 1);
        assert_eq!(slice.start_index, 0);
        assert_eq!(slice.end_index, 10);
    }

    #[test]
    fn paginate_reports_raw_window_beyond_range() {
        // The calculator itself never clamps the page.
        let slice = paginate(23, 10, 5);
        assert_eq!(slice.start_index, 40);
        assert_eq!(slice.end_index, 50);
        assert_eq!(slice.total_pages, 3);
    }

    #[test]
    fn default_state_shows_first_page_sorted_ascending() {
        let people = cast23();
        let view = derive_view(&people, &ViewState::new(10));
        assert_eq!(view.total_filtered, 23);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.current_page, 1);
        assert!(!view.prev_enabled);
        assert!(view.next_enabled);
        assert_eq!(
            names(&people, &view.visible_rows),
            vec![
                "Andrea Cantillo",
                "Brock Underwood",
                "Carmen Molina",
                "Chuck McGill",
                "Elliott Schwartz",
                "Gretchen Schwartz",
                "Gus Fring",
                "Hank Schrader",
                "Hector Torres",
                "Howard Hamlin",
            ]
        );
    }

    #[test]
    fn search_resets_page_and_disables_all_navigation() {
        let people = cast23();
        let mut state = ViewState::new(10);
        state.go_to_page(2, 3);
        state.set_search_text("an");
        assert_eq!(state.current_page, 1);
        let view = derive_view(&people, &state);
        assert_eq!(view.total_filtered, 3);
        assert_eq!(view.total_pages, 1);
        assert!(!view.prev_enabled);
        assert!(!view.next_enabled);
    }

    #[test]
    fn page_size_change_resets_to_first_page() {
        let people = cast23();
        let mut state = ViewState::new(10);
        state.go_to_page(3, 3);
        assert!(state.set_page_size(20, &[10, 20]));
        assert_eq!(state.current_page, 1);
        let view = derive_view(&people, &state);
        assert_eq!(view.total_pages, 2);
    }

    #[test]
    fn unconfigured_page_size_is_ignored() {
        let mut state = ViewState::new(10);
        state.go_to_page(2, 3);
        assert!(!state.set_page_size(7, &[10, 20]));
        assert!(!state.set_page_size(0, &[10, 20]));
        assert_eq!(state.page_size, 10);
        assert_eq!(state.current_page, 2);
    }

    #[test]
    fn toggling_sort_keeps_the_page_index() {
        let people = cast23();
        let mut state = ViewState::new(10);
        state.toggle_sort();
        assert_eq!(state.sort_direction, SortDirection::Descending);
        assert_eq!(state.current_page, 1);
        let view = derive_view(&people, &state);
        assert_eq!(
            names(&people, &view.visible_rows),
            vec![
                "Wendy Colby",
                "Walter White",
                "Victor Reyes",
                "Todd Alquist",
                "Ted Beneke",
                "Steven Gomez",
                "Skyler White",
                "Nacho Varga",
                "Marie Schrader",
                "Lydia Quayle",
            ]
        );
    }

    #[test]
    fn go_to_last_lands_on_the_final_partial_page() {
        let people = cast23();
        let mut state = ViewState::new(10);
        let total = derive_view(&people, &state).total_pages;
        state.go_to_last(total);
        let view = derive_view(&people, &state);
        assert_eq!(view.current_page, 3);
        assert_eq!(
            names(&people, &view.visible_rows),
            vec!["Victor Reyes", "Walter White", "Wendy Colby"]
        );
        assert!(!view.next_enabled);
        assert!(view.prev_enabled);
    }

    #[test]
    fn go_to_page_clamps_out_of_range_requests() {
        let mut state = ViewState::new(10);
        state.go_to_page(99, 3);
        assert_eq!(state.current_page, 3);
        state.go_to_page(0, 3);
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn shrinking_filter_reconciles_the_page_down() {
        let people = cast23();
        let mut state = ViewState::new(10);
        state.go_to_page(3, 3);
        // A direct search_text write (no transition) models the stale state
        // a replaced record set can leave behind.
        state.search_text = "an".to_string();
        let view = derive_view(&people, &state);
        assert_eq!(view.current_page, 1);
        assert_eq!(view.visible_rows.len(), 3);
        assert!(!view.next_enabled);
        state.reconcile(view.total_pages);
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn page_invariant_holds_after_any_transition() {
        let people = cast23();
        let options = [10usize, 20];
        let mut state = ViewState::new(10);
        let transitions: Vec<Box<dyn Fn(&mut ViewState, usize)>> = vec![
            Box::new(|s, _| s.set_search_text("an")),
            Box::new(|s, _| s.toggle_sort()),
            Box::new(|s, t| s.go_to_last(t)),
            Box::new(|s, _| s.set_search_text("")),
            Box::new(|s, t| s.go_to_page(7, t)),
            Box::new(|s, _| {
                s.set_page_size(20, &[10, 20]);
            }),
            Box::new(|s, _| s.reset(10)),
        ];
        for step in transitions {
            let total = derive_view(&people, &state).total_pages;
            step(&mut state, total);
            let view = derive_view(&people, &state);
            state.reconcile(view.total_pages);
            assert!(state.current_page >= 1);
            assert!(state.current_page <= view.total_pages.max(1));
            assert!(options.contains(&state.page_size));
        }
    }

    #[test]
    fn reset_is_idempotent() {
        let mut state = ViewState::new(10);
        state.set_search_text("an");
        state.toggle_sort();
        state.set_page_size(20, &[10, 20]);
        state.reset(10);
        let once = state.clone();
        state.reset(10);
        assert_eq!(state, once);
        assert_eq!(state, ViewState::new(10));
    }

    #[test]
    fn derive_view_with_no_records_is_a_single_empty_page() {
        let view = derive_view(&[], &ViewState::new(10));
        assert_eq!(view.total_filtered, 0);
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.current_page, 1);
        assert!(view.visible_rows.is_empty());
        assert!(!view.prev_enabled);
        assert!(!view.next_enabled);
    }
}
