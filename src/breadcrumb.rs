//! Breadcrumb trail
//!
//! Ordered path of folders from the root to the current folder. Moving to a
//! folder already on the trail truncates back to it; anything else is treated
//! as a descent and appended.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub id: String,
    pub name: String,
}

impl Crumb {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trail {
    crumbs: Vec<Crumb>,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    /// A trail holding only the root.
    pub fn reset(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            crumbs: vec![Crumb::new(id, name)],
        }
    }

    pub fn crumbs(&self) -> &[Crumb] {
        &self.crumbs
    }

    pub fn current(&self) -> Option<&Crumb> {
        self.crumbs.last()
    }

    pub fn parent(&self) -> Option<&Crumb> {
        self.crumbs.len().checked_sub(2).and_then(|i| self.crumbs.get(i))
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.crumbs.iter().position(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.crumbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crumbs.is_empty()
    }

    /// Joins crumb names, e.g. `My Files / Docs`.
    pub fn render(&self, separator: &str) -> String {
        self.crumbs
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// Returns the trail after arriving at folder `id`.
///
/// If `id` is already on the trail everything after it is dropped (ancestor
/// navigation, or a refresh of the current folder). Otherwise one crumb is
/// appended.
pub fn advance(trail: &Trail, id: &str, name: &str) -> Trail {
    match trail.position(id) {
        Some(index) => Trail {
            crumbs: trail.crumbs[..=index].to_vec(),
        },
        None => {
            let mut crumbs = trail.crumbs.clone();
            crumbs.push(Crumb::new(id, name));
            Trail { crumbs }
        }
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Folder ids drawn from a small pool so sequences revisit ancestors.
    fn arb_steps() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(
            prop::sample::select(vec!["r", "a", "b", "c", "d", "e"]).prop_map(String::from),
            0..40,
        )
    }

    proptest! {
        /// The last crumb is the folder just arrived at, ids stay unique and
        /// each step either truncates to a known entry or appends one crumb.
        #[test]
        fn prop_advance_keeps_trail_consistent(steps in arb_steps()) {
            let mut trail = Trail::reset("r", "root");

            for id in &steps {
                let before = trail.clone();
                trail = advance(&before, id, id);

                prop_assert_eq!(&trail.current().unwrap().id, id);

                let mut seen = std::collections::HashSet::new();
                prop_assert!(trail.crumbs().iter().all(|c| seen.insert(c.id.clone())));

                match before.position(id) {
                    Some(index) => {
                        prop_assert_eq!(trail.len(), index + 1);
                        prop_assert_eq!(trail.crumbs(), &before.crumbs()[..=index]);
                    }
                    None => {
                        prop_assert_eq!(trail.len(), before.len() + 1);
                        prop_assert_eq!(&trail.crumbs()[..before.len()], before.crumbs());
                    }
                }
            }
        }
    }
}
