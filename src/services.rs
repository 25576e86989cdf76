pub mod aggregator;
pub mod crm_service;
pub mod dashboard_service;
pub mod pipeline_service;
