pub mod crm_repo;
pub use crm_repo::{CascadeRemoval, CrmDataSource};
pub mod memory_repo;
pub use memory_repo::InMemoryCrmRepository;
pub mod pg_repo;
pub use pg_repo::PgCrmRepository;
pub mod seed;
