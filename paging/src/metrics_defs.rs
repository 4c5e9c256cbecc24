//! Metrics definitions for paginated endpoints.

use shared::metrics_defs::{MetricDef, MetricType};

pub const PAGE_SERVED: MetricDef = MetricDef {
    name: "paging.page.served",
    metric_type: MetricType::Counter,
    description: "Number of windowed pages rendered",
};

pub const PAGE_SIZE: MetricDef = MetricDef {
    name: "paging.page.size",
    metric_type: MetricType::Histogram,
    description: "Number of elements materialized per page",
};

pub const ALL_METRICS: &[MetricDef] = &[PAGE_SERVED, PAGE_SIZE];
