//! Metrics definitions for the bundle resolution cache.

use shared::metrics_defs::{MetricDef, MetricType};

pub const CACHE_HIT: MetricDef = MetricDef {
    name: "i18n.cache.hit",
    metric_type: MetricType::Counter,
    description: "Bundle lookups answered from a cached translation table",
};

pub const CACHE_NEGATIVE_HIT: MetricDef = MetricDef {
    name: "i18n.cache.negative_hit",
    metric_type: MetricType::Counter,
    description: "Bundle lookups answered from a cached not-found result",
};

pub const CACHE_MISS: MetricDef = MetricDef {
    name: "i18n.cache.miss",
    metric_type: MetricType::Counter,
    description: "Bundle lookups that went to the plugin resolver and loader",
};

pub const RESOLVE_DURATION: MetricDef = MetricDef {
    name: "i18n.resolve.duration",
    metric_type: MetricType::Histogram,
    description: "Time spent resolving a bundle on a cache miss, in seconds",
};

pub const ALL_METRICS: &[MetricDef] = &[CACHE_HIT, CACHE_NEGATIVE_HIT, CACHE_MISS, RESOLVE_DURATION];
