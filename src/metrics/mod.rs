//! Metric normalization
//!
//! Raw upstream payloads are adapted into the fixed internal model here:
//! severity summaries, proportional series, and the scalar dashboard metrics.
//! Everything in this module is a pure function of its input.

pub mod adapters;
pub mod fields;
pub mod outcome;
pub mod series;
pub mod severity;

pub use adapters::{DefectTypeDistribution, RemarkRatio};
pub use outcome::{settle, MetricState};
pub use series::{ProportionalSeries, ProportionalSeriesBuilder, SeriesEntry, SeriesFields};
pub use severity::{SeverityBucket, SeveritySummary};
