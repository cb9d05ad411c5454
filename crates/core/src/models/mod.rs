pub mod analytics;
pub mod market;
pub mod note;
pub mod quote;
pub mod ticker;
pub mod transaction;
