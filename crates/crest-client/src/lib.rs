//! HTTP backend implementation for the Crest chat client.
//!
//! Provides the transport, the endpoint resolver, the in-memory credential
//! store, the durable user cache, and configuration — everything
//! `crest-core`'s controller needs injected to talk to a real deployment.

pub mod api;
pub mod config;
pub mod credentials;
pub mod paths;
pub mod storage;
pub mod transport;

pub use api::CrestApi;
pub use config::ClientConfig;
pub use credentials::CredentialStore;
pub use storage::FileUserCache;
pub use transport::ApiClient;
