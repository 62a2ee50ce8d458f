// Adapters layer: concrete implementations for external systems (breed API, record cache).

pub mod cache;
pub mod http;
