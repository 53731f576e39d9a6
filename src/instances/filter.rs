//! Which instance listing the page fetches.

use crate::validation::InstanceFilter;

/// The two fetch strategies. `Scoped` carries both dimensions by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchScope {
    #[default]
    Unscoped,
    Scoped { year: i32, semester: i32 },
}

impl FetchScope {
    pub fn period(&self) -> Option<(i32, i32)> {
        match *self {
            FetchScope::Scoped { year, semester } => Some((year, semester)),
            FetchScope::Unscoped => None,
        }
    }
}

/// Filter values plus the show-all flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterState {
    pub year: Option<i32>,
    pub semester: Option<i32>,
    pub show_all: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            year: None,
            semester: None,
            show_all: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    /// The scope changed (or was re-applied) and a fetch is due.
    Applied(FetchScope),
    /// A dimension was missing; nothing changed.
    Ignored,
}

impl FilterState {
    /// Scoped only when both dimensions are present and show-all is off.
    pub fn scope(&self) -> FetchScope {
        match (self.show_all, self.year, self.semester) {
            (false, Some(year), Some(semester)) => FetchScope::Scoped { year, semester },
            _ => FetchScope::Unscoped,
        }
    }

    pub fn apply(&mut self, filter: InstanceFilter) -> FilterOutcome {
        match (filter.year, filter.semester) {
            (Some(year), Some(semester)) => {
                self.year = Some(year);
                self.semester = Some(semester);
                self.show_all = false;
                FilterOutcome::Applied(self.scope())
            }
            _ => FilterOutcome::Ignored,
        }
    }

    pub fn clear(&mut self) -> FetchScope {
        *self = FilterState::default();
        self.scope()
    }
}
