mod next_correlation_id;

pub use next_correlation_id::next_correlation_id;
