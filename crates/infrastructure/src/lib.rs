//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_procurement_api_client;
mod in_memory_rbac_repository;

pub use http_procurement_api_client::{HttpProcurementApiClient, TENANT_HEADER};
pub use in_memory_rbac_repository::InMemoryRbacRepository;
