pub mod error_reporter;
pub mod summary;

pub use error_reporter::{derive_message, read_error};
pub use summary::{GradingWeight, SummaryField, SummaryRecord, WeightValue, UNPARSED_WEIGHTS_KEY};
