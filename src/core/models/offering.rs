//! Course offering model and recurring-slot expansion

use chrono::NaiveDate;
use logger::warn;
use once_cell::sync::OnceCell;

/// Non-owning handle to an offering: its index in the owning
/// [`OfferingCatalog`].
pub type OfferingId = usize;

/// Upper bound on expanded slots per offering, to bound memory on
/// pathological input.
pub const MAX_SLOTS_PER_OFFERING: usize = 1000;

/// Date format used by the backend's day patterns (e.g. "04/03/2024").
const DATE_FORMAT: &str = "%d/%m/%Y";

/// One concrete calendar occurrence of an offering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSlot {
    /// Calendar date of the occurrence
    pub date: NaiveDate,
    /// Raw period-group string (e.g. "1,2,3"), kept for timetable lookup
    pub period_group: String,
    /// Parsed lesson-period numbers
    pub periods: Vec<u32>,
    /// Handle to the owning offering (lookup only, no ownership)
    pub offering: OfferingId,
}

impl ScheduleSlot {
    /// Two slots conflict iff their dates are equal and their period sets
    /// share at least one element.
    #[must_use]
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.date == other.date && self.periods.iter().any(|p| other.periods.contains(p))
    }
}

/// Result of expanding an offering's recurring pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct SlotExpansion {
    slots: Vec<ScheduleSlot>,
    skipped: usize,
}

/// One schedulable section of a subject.
///
/// The slot sequence is expanded lazily on first access and memoized: it is
/// computed at most once per offering and never recomputed, even if the
/// backing pattern fields are mutated afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseOffering {
    /// Handle assigned by the owning catalog
    pub id: OfferingId,

    /// Display subject name; the uniqueness key, stable across sections
    pub subject: String,

    /// Full label including the section class code
    pub label: String,

    /// Whitespace-separated dd/mm/yyyy dates, one per meeting
    pub day_pattern: String,

    /// Whitespace-separated period groups, positionally paired with the dates
    pub period_pattern: String,

    /// Teacher name (free text)
    pub teacher: String,

    /// Study location (free text)
    pub location: String,

    /// Memoized slot expansion
    slots: OnceCell<SlotExpansion>,
}

impl CourseOffering {
    /// Create a new offering. Slots are not expanded until first access.
    #[must_use]
    pub fn new(
        id: OfferingId,
        subject: String,
        label: String,
        day_pattern: String,
        period_pattern: String,
        teacher: String,
        location: String,
    ) -> Self {
        Self {
            id,
            subject,
            label,
            day_pattern,
            period_pattern,
            teacher,
            location,
            slots: OnceCell::new(),
        }
    }

    /// The expanded slot sequence, computed on first access.
    #[must_use]
    pub fn slots(&self) -> &[ScheduleSlot] {
        &self.expansion().slots
    }

    /// Number of day-pattern positions skipped due to malformed dates.
    #[must_use]
    pub fn skipped_dates(&self) -> usize {
        self.expansion().skipped
    }

    fn expansion(&self) -> &SlotExpansion {
        self.slots.get_or_init(|| expand(self))
    }

    /// Extract the section number from the trailing parenthesised class code
    /// of the label, as "Lxx".
    ///
    /// Example: "Triết học Mác - Lênin-1-25 (A22C10D904)" -> "L04".
    /// Returns an empty string when the label carries no usable code.
    #[must_use]
    pub fn section_code(&self) -> String {
        let (Some(open), Some(close)) = (self.label.rfind('('), self.label.rfind(')')) else {
            return String::new();
        };
        if close <= open {
            return String::new();
        }

        let code = &self.label[open + 1..close];
        let chars: Vec<char> = code.chars().collect();
        if chars.len() >= 2 {
            let tail: String = chars[chars.len() - 2..].iter().collect();
            if tail.chars().all(|c| c.is_ascii_digit()) {
                return format!("L{tail}");
            }
            // Not a digit suffix; fall back to the last two digits anywhere
            // in the code.
            let digits: Vec<char> = chars.iter().copied().filter(char::is_ascii_digit).collect();
            if digits.len() >= 2 {
                let last_two: String = digits[digits.len() - 2..].iter().collect();
                return format!("L{last_two}");
            }
        }

        String::new()
    }
}

/// Expand the day/period patterns into concrete slots.
///
/// The i-th date pairs with the i-th period group; a malformed date is skipped
/// (warn-logged) without aborting the remaining positions.
fn expand(offering: &CourseOffering) -> SlotExpansion {
    let days: Vec<&str> = offering.day_pattern.split_whitespace().collect();
    let groups: Vec<&str> = offering.period_pattern.split_whitespace().collect();

    let positions = days
        .len()
        .min(groups.len())
        .min(MAX_SLOTS_PER_OFFERING);

    let mut slots = Vec::with_capacity(positions);
    let mut skipped = 0usize;

    for i in 0..positions {
        match NaiveDate::parse_from_str(days[i], DATE_FORMAT) {
            Ok(date) => slots.push(ScheduleSlot {
                date,
                period_group: groups[i].to_string(),
                periods: parse_periods(groups[i]),
                offering: offering.id,
            }),
            Err(err) => {
                warn!(
                    "Skipping malformed date '{}' for offering '{}': {err}",
                    days[i], offering.label
                );
                skipped += 1;
            }
        }
    }

    SlotExpansion { slots, skipped }
}

/// Parse a comma-separated period group into period numbers, ignoring
/// non-numeric parts.
fn parse_periods(group: &str) -> Vec<u32> {
    group
        .split(',')
        .filter_map(|part| part.trim().parse::<u32>().ok())
        .collect()
}

/// Append-only table of offerings; assigns each offering its
/// [`OfferingId`] handle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfferingCatalog {
    offerings: Vec<CourseOffering>,
}

impl OfferingCatalog {
    /// Create an empty catalog
    #[must_use]
    pub const fn new() -> Self {
        Self {
            offerings: Vec::new(),
        }
    }

    /// Add an offering and return its handle.
    pub fn add(
        &mut self,
        subject: String,
        label: String,
        day_pattern: String,
        period_pattern: String,
        teacher: String,
        location: String,
    ) -> OfferingId {
        let id = self.offerings.len();
        self.offerings.push(CourseOffering::new(
            id,
            subject,
            label,
            day_pattern,
            period_pattern,
            teacher,
            location,
        ));
        id
    }

    /// Look up an offering by handle.
    #[must_use]
    pub fn get(&self, id: OfferingId) -> Option<&CourseOffering> {
        self.offerings.get(id)
    }

    /// Find an offering by its full label.
    #[must_use]
    pub fn find_by_label(&self, label: &str) -> Option<&CourseOffering> {
        self.offerings.iter().find(|o| o.label == label)
    }

    /// All offerings in insertion order.
    #[must_use]
    pub fn offerings(&self) -> &[CourseOffering] {
        &self.offerings
    }

    /// Number of distinct subjects across all offerings.
    #[must_use]
    pub fn distinct_subjects(&self) -> usize {
        let mut subjects: Vec<&str> = self.offerings.iter().map(|o| o.subject.as_str()).collect();
        subjects.sort_unstable();
        subjects.dedup();
        subjects.len()
    }

    /// Number of offerings in the catalog.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.offerings.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.offerings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offering(day_pattern: &str, period_pattern: &str) -> CourseOffering {
        CourseOffering::new(
            0,
            "Toán cao cấp".to_string(),
            "Toán cao cấp-1-25 (A22C10D904)".to_string(),
            day_pattern.to_string(),
            period_pattern.to_string(),
            "Nguyễn Văn A".to_string(),
            "301-A2".to_string(),
        )
    }

    #[test]
    fn test_expand_pairs_dates_with_period_groups() {
        let off = offering("04/03/2024 11/03/2024", "1,2,3 4,5,6");
        let slots = off.slots();

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(slots[0].periods, vec![1, 2, 3]);
        assert_eq!(slots[1].date, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(slots[1].periods, vec![4, 5, 6]);
        assert_eq!(off.skipped_dates(), 0);
    }

    #[test]
    fn test_expand_skips_malformed_dates_without_aborting() {
        let off = offering("32/13/2024 11/03/2024", "1,2,3 4,5,6");
        let slots = off.slots();

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].periods, vec![4, 5, 6]);
        assert_eq!(off.skipped_dates(), 1);
    }

    #[test]
    fn test_expand_uses_shorter_pattern_length() {
        let off = offering("04/03/2024 11/03/2024 18/03/2024", "1,2,3");
        assert_eq!(off.slots().len(), 1);
    }

    #[test]
    fn test_expand_caps_slot_count() {
        let days: Vec<String> = (0..1100).map(|_| "04/03/2024".to_string()).collect();
        let groups: Vec<String> = (0..1100).map(|_| "1,2,3".to_string()).collect();
        let off = offering(&days.join(" "), &groups.join(" "));

        assert_eq!(off.slots().len(), MAX_SLOTS_PER_OFFERING);
    }

    #[test]
    fn test_expansion_is_memoized() {
        let mut off = offering("04/03/2024", "1,2,3");
        let first = off.slots().to_vec();

        // Mutating the backing field after the first expansion must not
        // change the cached result.
        off.day_pattern = "11/03/2024".to_string();
        assert_eq!(off.slots(), first.as_slice());
    }

    #[test]
    fn test_slot_conflict_requires_same_date_and_shared_period() {
        let a = offering("04/03/2024", "1,2,3");
        let b = offering("04/03/2024", "3,4,5");
        let c = offering("04/03/2024", "4,5,6");
        let d = offering("05/03/2024", "1,2,3");

        assert!(a.slots()[0].conflicts_with(&b.slots()[0]));
        assert!(!a.slots()[0].conflicts_with(&c.slots()[0]));
        assert!(!a.slots()[0].conflicts_with(&d.slots()[0]));
    }

    #[test]
    fn test_parse_periods_ignores_junk() {
        assert_eq!(parse_periods("1,2,x,3"), vec![1, 2, 3]);
        assert_eq!(parse_periods(""), Vec::<u32>::new());
    }

    #[test]
    fn test_section_code_from_label() {
        let off = offering("04/03/2024", "1,2,3");
        assert_eq!(off.section_code(), "L04");

        let no_parens = CourseOffering::new(
            1,
            "Anh văn".to_string(),
            "Anh văn 1".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        );
        assert_eq!(no_parens.section_code(), "");
    }

    #[test]
    fn test_catalog_assigns_sequential_ids() {
        let mut catalog = OfferingCatalog::new();
        let first = catalog.add(
            "Toán".to_string(),
            "Toán (L01)".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        );
        let second = catalog.add(
            "Lý".to_string(),
            "Lý (L01)".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        );

        assert_eq!(first, 0);
        assert_eq!(second, 1);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(first).unwrap().subject, "Toán");
        assert_eq!(catalog.distinct_subjects(), 2);
    }
}
