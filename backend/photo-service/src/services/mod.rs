mod aggregation;

pub use aggregation::AggregationService;
