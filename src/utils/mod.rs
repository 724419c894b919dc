mod aggregation;

pub use aggregation::aggregate_data;
