//! Storefront Users
//!
//! Authentication and profile data live with the hosted identity provider;
//! the application only ever sees an opaque user identity.

use crate::uuids::TypedUuid;

/// Marker for user identities issued by the identity provider.
#[derive(Debug, Clone)]
pub struct UserRecord;

/// User UUID
pub type UserUuid = TypedUuid<UserRecord>;
