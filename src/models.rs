pub mod activity;
pub mod crm;
pub mod dashboard;
pub mod pipeline;
