mod handler;
mod model;

pub use handler::{get_filing_history, get_officers, get_profile};
