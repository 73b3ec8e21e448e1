pub mod admin;
pub mod annotation;
pub mod catalog;
pub mod payment;
pub mod reading;
pub mod subscription;
pub mod user;
