//! Data Transfer Objects for REST request/response serialization.

pub mod common_dto;
pub mod liked_dto;
pub mod navigation_dto;
pub mod session_dto;

pub use common_dto::*;
pub use liked_dto::*;
pub use navigation_dto::*;
pub use session_dto::*;
