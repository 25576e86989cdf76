pub mod activities;
pub mod customers;
pub mod dashboard;
pub mod deals;
