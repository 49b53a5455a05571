pub mod event;
pub mod registration;
pub mod stats;
