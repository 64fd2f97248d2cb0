//! Authentication surface re-exported for the `web` layer, which depends on
//! `domain` rather than on `entity_api` directly.

pub use entity_api::user::{AuthSession, Backend, Credentials};
