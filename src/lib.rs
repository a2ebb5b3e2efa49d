pub mod books;
pub mod catalog;
pub mod samples;
pub mod utils;
