//! huntboard-store: dual-backend persistence for the huntboard tracker.
//!
//! Two interchangeable backends sit behind the [`store::Store`] trait: a
//! local SQLite file for the guest scope and a cached remote transport for
//! signed-in identities. [`dispatch::ScopedStore`] picks one per scope;
//! [`migrate`] moves guest data across exactly once.

pub mod activity;
pub mod cache;
pub mod clock;
pub mod dispatch;
pub mod error;
pub mod local;
pub mod migrate;
pub mod remote;
pub mod scope;
pub mod store;

pub use cache::CachedStore;
pub use dispatch::{ScopedStore, open_scoped};
pub use error::{StoreError, TransportError};
pub use local::LocalStore;
pub use remote::{HttpTransport, MemoryTransport, RemoteStore};
pub use scope::Scope;
pub use store::Store;
