mod redis;
mod sessions;
mod state_builder;

pub use redis::build_redis_client;
pub use sessions::{build_memory_session_layer, build_redis_session_layer};
pub use state_builder::build_app_state;
