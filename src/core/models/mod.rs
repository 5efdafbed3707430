//! Data models for the planning engine

pub mod offering;
pub mod record;
pub mod selection;

pub use offering::{CourseOffering, OfferingCatalog, OfferingId, ScheduleSlot};
pub use record::ScoreRecord;
pub use selection::SelectionSet;
