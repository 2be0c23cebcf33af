use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, SessionStore};

use crate::api_config::ApiConfig;
use crate::redis_session_store::RedisSessionStore;

const SESSION_KEY_PREFIX: &str = "procura:session";

pub fn build_memory_session_layer(config: &ApiConfig) -> SessionManagerLayer<MemoryStore> {
    configure(MemoryStore::default(), config)
}

pub fn build_redis_session_layer(
    redis_client: redis::Client,
    config: &ApiConfig,
) -> SessionManagerLayer<RedisSessionStore> {
    configure(
        RedisSessionStore::new(redis_client, SESSION_KEY_PREFIX),
        config,
    )
}

fn configure<Store: SessionStore>(store: Store, config: &ApiConfig) -> SessionManagerLayer<Store> {
    SessionManagerLayer::new(store)
        .with_secure(config.cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(
            config.session_inactivity_minutes,
        )))
}
