//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_business_access_gateway;
mod in_memory_business_grant_cache;
mod system_clock;

pub use http_business_access_gateway::HttpBusinessAccessGateway;
pub use in_memory_business_grant_cache::InMemoryBusinessGrantCache;
pub use system_clock::SystemClock;
