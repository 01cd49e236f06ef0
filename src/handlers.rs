pub mod booking;
pub mod dashboard;
pub mod payment;
pub mod review;
pub mod schedule;
pub mod utils;
