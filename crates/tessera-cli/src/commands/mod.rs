pub mod clean;
pub mod convert;
pub mod csv;
pub mod integrate;
pub mod query;
pub mod request;
