//! Reconciles a CI project with a vulnerability-tracking service.
//!
//! The flow for one pipeline run is: [`prober::ensure_available`] once, then
//! [`reconciler::reconcile_project`] to resolve the product and engagement
//! ids, which [`output::OutputSink`] hands to later steps. Each scan report
//! is sent separately through [`uploader::upload`].

pub mod client;
pub mod errors;
pub mod metrics_defs;
pub mod output;
pub mod prober;
pub mod reconciler;
pub mod remediation;
pub mod setup;
pub mod types;
pub mod uploader;

#[cfg(test)]
mod testutils;

pub use errors::{Result, TrackerError};
pub use reqwest::StatusCode;
