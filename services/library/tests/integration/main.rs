mod helpers;

mod admin_test;
mod annotation_test;
mod catalog_test;
mod http_test;
mod reading_test;
mod repository_test;
