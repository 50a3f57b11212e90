//! # defect-pulse
//!
//! Metrics aggregation and chart geometry for a defect-tracking dashboard.
//!
//! ## Usage
//!
//! ```bash
//! defect-pulse projects [--risk high]
//! defect-pulse metrics <project-id>
//! ```
//!
//! ## Modules
//!
//! - `api` - Upstream REST contract, HTTP client and scriptable mock
//! - `app` - Configuration, logging and fatal error handling for the binary
//! - `chart` - Pie, gauge and thermometer geometry
//! - `dashboard` - Project overview with risk tiers, counts and filtering
//! - `metrics` - Per-endpoint adapters, severity aggregation and proportional series
//! - `model` - Domain types shared across modules
//! - `orchestrator` - Concurrent per-project fetch cycle and last-request-wins state
//! - `risk` - Project risk classification
//! - `view` - Render-ready projection of a metrics bundle
pub mod api;
pub mod app;
pub mod chart;
pub mod dashboard;
pub mod error;
pub mod metrics;
pub mod model;
pub mod orchestrator;
pub mod risk;
pub mod view;
