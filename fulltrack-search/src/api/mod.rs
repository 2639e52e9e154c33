//! HTTP API handlers for fulltrack-search

pub mod health;
pub mod legal;
pub mod search;
pub mod stream;

pub use health::health_routes;
pub use legal::legal_routes;
pub use search::search_routes;
pub use stream::stream_routes;
