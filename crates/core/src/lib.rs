//! Domain model for the Wordify vocabulary trainer.
//!
//! Pure data and derived statistics: topic progress aggregation, quiz
//! scoring, history filtering and flashcard pass summaries. No I/O.

pub mod error;
pub mod model;
pub mod time;

pub use error::Error;
pub use time::Clock;
