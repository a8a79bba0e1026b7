//! Client-side identity: the persisted session, role capabilities and the
//! authenticated request wrapper.
//! Keep the public surface thin and split implementation across sub-modules.

mod authority;
mod capability;
mod navigator;
mod profile;
mod request;
mod store;

pub use authority::{merge_headers, SessionAuthority, SessionState, DEFAULT_LOGIN_PATH, JSON_CONTENT_TYPE};
pub use capability::{capabilities_for, Capability, ADMIN, EDITOR, SUPERADMIN, VIEWER};
pub use navigator::{Navigator, PendingNavigator, TracingNavigator};
pub use profile::{ProfileRead, UserProfile};
pub use request::RequestOptions;
pub use store::{DetachedStore, FileStore, MemoryStore, SessionStore, StorageKey, StoreError, StoreResult};
