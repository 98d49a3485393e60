pub mod enums;
pub mod query;
pub mod response;
