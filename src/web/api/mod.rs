pub mod error;
pub mod panel;
