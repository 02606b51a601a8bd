//! Gateway types module
//!
//! - [`ApiResponse<T>`]: Unified API response wrapper
//! - [`ValidJson`]: JSON body extractor with envelope-shaped rejections
//! - [`error_codes`]: Numeric response codes

pub mod extract;
pub mod response;

pub use extract::ValidJson;
pub use response::{ApiResponse, api_code, error_codes};
