//! Schedule conflict engine
//!
//! Expands offerings into concrete calendar slots (see
//! [`crate::core::models::offering`]) and enforces the virtual-selection
//! invariants:
//! 1. At most one offering per subject key; selecting a new section for an
//!    already-represented subject replaces the previous one.
//! 2. No two selected offerings may have any pair of conflicting slots; a
//!    violating selection attempt is rejected in full and the prior selection
//!    is preserved.
//!
//! A conflict is an expected, recoverable outcome, reported as a typed result
//! carrying the clashing offerings rather than as an exceptional condition.

pub mod timetable;

use crate::core::models::{CourseOffering, OfferingCatalog, OfferingId, SelectionSet};
use thiserror::Error;

/// Per offering pair, slot comparison is capped at the first N slots of each
/// side to bound worst-case cost.
pub const MAX_COMPARED_SLOTS: usize = 100;

/// A rejected selection attempt: the candidate clashes with offerings already
/// in the selection. The selection is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("schedule conflict with {} selected offering(s)", conflicting.len())]
pub struct ConflictError {
    /// Handles of the selected offerings that clash with the candidate
    pub conflicting: Vec<OfferingId>,
}

/// Whether two offerings have any pair of conflicting slots.
///
/// Comparison is capped at the first [`MAX_COMPARED_SLOTS`] slots of each
/// side and short-circuits on the first conflicting pair.
#[must_use]
pub fn offerings_conflict(a: &CourseOffering, b: &CourseOffering) -> bool {
    let slots_a = a.slots();
    let slots_b = b.slots();
    let limit_a = slots_a.len().min(MAX_COMPARED_SLOTS);
    let limit_b = slots_b.len().min(MAX_COMPARED_SLOTS);

    slots_a[..limit_a]
        .iter()
        .any(|slot_a| slots_b[..limit_b].iter().any(|slot_b| slot_a.conflicts_with(slot_b)))
}

/// Every selected offering that clashes with the candidate.
#[must_use]
pub fn find_conflicts(
    candidate: &CourseOffering,
    selection: &SelectionSet,
    catalog: &OfferingCatalog,
) -> Vec<OfferingId> {
    selection
        .ids()
        .iter()
        .copied()
        .filter(|&id| {
            catalog
                .get(id)
                .is_some_and(|selected| offerings_conflict(candidate, selected))
        })
        .collect()
}

/// Attempt to select an offering.
///
/// Any already-selected offering for the candidate's subject is provisionally
/// removed, then the candidate is checked against the rest of the selection.
/// On conflict the attempt fails as a whole: the returned error lists the
/// clashing offerings and `selection` is untouched (the provisional removal
/// never escapes). On success the new selection is returned.
///
/// # Errors
///
/// Returns [`ConflictError`] when the candidate clashes with the remaining
/// selection.
pub fn select(
    selection: &SelectionSet,
    candidate: &CourseOffering,
    catalog: &OfferingCatalog,
) -> Result<SelectionSet, ConflictError> {
    let mut next = selection.clone();

    // Re-selecting the same section is a no-op for the membership below;
    // drop it first so it cannot conflict with itself.
    next.remove(candidate.id);
    if let Some(existing) = next.find_by_subject(catalog, &candidate.subject) {
        next.remove(existing);
    }

    let conflicting = find_conflicts(candidate, &next, catalog);
    if !conflicting.is_empty() {
        return Err(ConflictError { conflicting });
    }

    next.push(candidate.id);
    Ok(next)
}

/// Deselect an offering. Always succeeds; removing an unselected offering is
/// a no-op.
#[must_use]
pub fn deselect(selection: &SelectionSet, offering: OfferingId) -> SelectionSet {
    let mut next = selection.clone();
    next.remove(offering);
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Catalog with labelled offerings; returns the catalog and ids in order.
    fn catalog(entries: &[(&str, &str, &str, &str)]) -> (OfferingCatalog, Vec<OfferingId>) {
        let mut catalog = OfferingCatalog::new();
        let ids = entries
            .iter()
            .map(|(subject, label, days, periods)| {
                catalog.add(
                    (*subject).to_string(),
                    (*label).to_string(),
                    (*days).to_string(),
                    (*periods).to_string(),
                    String::new(),
                    String::new(),
                )
            })
            .collect();
        (catalog, ids)
    }

    #[test]
    fn test_offerings_conflict_on_shared_period() {
        let (catalog, ids) = catalog(&[
            ("Toán", "Toán (L01)", "04/03/2024", "1,2,3"),
            ("Lý", "Lý (L01)", "04/03/2024", "3,4,5"),
            ("Hóa", "Hóa (L01)", "04/03/2024", "4,5,6"),
        ]);

        let toan = catalog.get(ids[0]).unwrap();
        let ly = catalog.get(ids[1]).unwrap();
        let hoa = catalog.get(ids[2]).unwrap();

        assert!(offerings_conflict(toan, ly));
        assert!(!offerings_conflict(toan, hoa));
    }

    #[test]
    fn test_select_and_find_conflicts() {
        let (catalog, ids) = catalog(&[
            ("Toán", "Toán (L01)", "04/03/2024", "1,2,3"),
            ("Lý", "Lý (L01)", "04/03/2024", "3,4,5"),
        ]);

        let selection = SelectionSet::new();
        let selection = select(&selection, catalog.get(ids[0]).unwrap(), &catalog).unwrap();

        let conflicts = find_conflicts(catalog.get(ids[1]).unwrap(), &selection, &catalog);
        assert_eq!(conflicts, vec![ids[0]]);
    }

    #[test]
    fn test_conflicting_selection_is_rejected_atomically() {
        let (catalog, ids) = catalog(&[
            ("Toán", "Toán (L01)", "04/03/2024", "1,2,3"),
            ("Lý", "Lý (L01)", "04/03/2024", "3,4,5"),
        ]);

        let selection = select(&SelectionSet::new(), catalog.get(ids[0]).unwrap(), &catalog)
            .unwrap();
        let before = selection.clone();

        let err = select(&selection, catalog.get(ids[1]).unwrap(), &catalog).unwrap_err();
        assert_eq!(err.conflicting, vec![ids[0]]);
        // The failed attempt must not have mutated the selection.
        assert_eq!(selection, before);
    }

    #[test]
    fn test_same_subject_selection_replaces() {
        let (catalog, ids) = catalog(&[
            ("Toán", "Toán (L01)", "04/03/2024", "1,2,3"),
            ("Toán", "Toán (L02)", "05/03/2024", "1,2,3"),
        ]);

        let selection = select(&SelectionSet::new(), catalog.get(ids[0]).unwrap(), &catalog)
            .unwrap();
        let selection = select(&selection, catalog.get(ids[1]).unwrap(), &catalog).unwrap();

        assert!(selection.contains(ids[1]));
        assert!(!selection.contains(ids[0]));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_replacement_ignores_old_sections_own_slots() {
        // The new section overlaps the old one's slots; since the old section
        // is provisionally removed, the selection must succeed.
        let (catalog, ids) = catalog(&[
            ("Toán", "Toán (L01)", "04/03/2024", "1,2,3"),
            ("Toán", "Toán (L02)", "04/03/2024", "1,2,3"),
        ]);

        let selection = select(&SelectionSet::new(), catalog.get(ids[0]).unwrap(), &catalog)
            .unwrap();
        let selection = select(&selection, catalog.get(ids[1]).unwrap(), &catalog).unwrap();
        assert_eq!(selection.ids(), &[ids[1]]);
    }

    #[test]
    fn test_failed_replacement_rolls_back_provisional_removal() {
        // Candidate replaces its subject-mate but clashes with a third
        // offering: the attempt fails and the original selection (including
        // the subject-mate) survives.
        let (catalog, ids) = catalog(&[
            ("Toán", "Toán (L01)", "04/03/2024", "1,2,3"),
            ("Lý", "Lý (L01)", "04/03/2024", "4,5,6"),
            ("Toán", "Toán (L02)", "04/03/2024", "4,5,6"),
        ]);

        let selection = select(&SelectionSet::new(), catalog.get(ids[0]).unwrap(), &catalog)
            .unwrap();
        let selection = select(&selection, catalog.get(ids[1]).unwrap(), &catalog).unwrap();
        let before = selection.clone();

        let err = select(&selection, catalog.get(ids[2]).unwrap(), &catalog).unwrap_err();
        assert_eq!(err.conflicting, vec![ids[1]]);
        assert_eq!(selection, before);
        assert!(selection.contains(ids[0]));
    }

    #[test]
    fn test_deselect_always_succeeds() {
        let (catalog, ids) = catalog(&[("Toán", "Toán (L01)", "04/03/2024", "1,2,3")]);

        let selection = select(&SelectionSet::new(), catalog.get(ids[0]).unwrap(), &catalog)
            .unwrap();
        let selection = deselect(&selection, ids[0]);
        assert!(selection.is_empty());

        // Deselecting again is a no-op.
        let selection = deselect(&selection, ids[0]);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_reselecting_same_offering_is_idempotent() {
        let (catalog, ids) = catalog(&[("Toán", "Toán (L01)", "04/03/2024", "1,2,3")]);

        let selection = select(&SelectionSet::new(), catalog.get(ids[0]).unwrap(), &catalog)
            .unwrap();
        let selection = select(&selection, catalog.get(ids[0]).unwrap(), &catalog).unwrap();
        assert_eq!(selection.ids(), &[ids[0]]);
    }
}
