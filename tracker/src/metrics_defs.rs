//! Metrics definitions for the tracker.

use shared::metrics_defs::{MetricDef, MetricType};

pub const PROBE_FAILURE: MetricDef = MetricDef {
    name: "probe.failure",
    metric_type: MetricType::Counter,
    description: "Number of availability probes that did not get a 2xx response",
};

pub const REMEDIATION_RUN: MetricDef = MetricDef {
    name: "remediation.run",
    metric_type: MetricType::Counter,
    description: "Number of times the remediation action was started",
};

pub const RECONCILE_REUSED: MetricDef = MetricDef {
    name: "reconcile.reused",
    metric_type: MetricType::Counter,
    description: "Resources resolved from an existing entry, tagged by kind",
};

pub const RECONCILE_CREATED: MetricDef = MetricDef {
    name: "reconcile.created",
    metric_type: MetricType::Counter,
    description: "Resources created because the lookup returned none, tagged by kind",
};

pub const UPLOAD_SUCCESS: MetricDef = MetricDef {
    name: "upload.success",
    metric_type: MetricType::Counter,
    description: "Scan reports accepted by the ingestion endpoint",
};

pub const UPLOAD_FAILURE: MetricDef = MetricDef {
    name: "upload.failure",
    metric_type: MetricType::Counter,
    description: "Scan reports that could not be uploaded",
};

pub const UPLOAD_SIZE: MetricDef = MetricDef {
    name: "upload.size_bytes",
    metric_type: MetricType::Histogram,
    description: "Size of uploaded scan reports in bytes",
};

pub const ALL_METRICS: &[MetricDef] = &[
    PROBE_FAILURE,
    REMEDIATION_RUN,
    RECONCILE_REUSED,
    RECONCILE_CREATED,
    UPLOAD_SUCCESS,
    UPLOAD_FAILURE,
    UPLOAD_SIZE,
];
