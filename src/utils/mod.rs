// Utility functions

pub mod logger;
pub mod http;
pub mod text;

pub use logger::*;
pub use http::*;
pub use text::*;
