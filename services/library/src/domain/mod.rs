pub mod payment;
pub mod reading;
pub mod repository;
pub mod types;
