//! Clickstream analytics core
//!
//! Pure computation over already-fetched users, sessions and events: period
//! resolution, per-event enrichment, session rollup, journey folding and the
//! KPI report builders. Nothing in here performs I/O.

pub mod clock;
pub mod enrichment;
pub mod journey;
pub mod model;
pub mod period;
pub mod reports;
pub mod rollup;
pub mod round;

pub use clock::{Clock, FixedClock, SystemClock};
pub use enrichment::{EnrichedEvent, enrich_events};
pub use journey::{EmptyJourney, JourneyResponse, JourneyView, build_journey, fold_journey};
pub use model::{EventRecord, EventType, Metadata, NewEvent, SessionRecord, UserRecord};
pub use period::{Period, TimeRange, WeekStart, resolve};
pub use rollup::{JourneyEvent, SessionSummary, rollup_session};
pub use round::round2;
