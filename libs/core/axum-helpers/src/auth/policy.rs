//! Role gate: compares the authenticated role against a route's allow-list.

use std::marker::PhantomData;
use std::ops::Deref;

use axum::{extract::FromRequestParts, http::request::Parts};
use core_accounts::{Role, RoleSet};

use super::middleware::CurrentIdentity;
use crate::errors::{AppError, messages};

/// A route's role allow-list, fixed at compile time.
pub trait RolePolicy: Send + Sync + 'static {
    const ALLOWED: RoleSet;
}

/// SUPER_ADMIN only
pub struct SuperAdminOnly;
/// ADMIN or SUPER_ADMIN
pub struct Staff;
pub struct SellerOnly;
/// ADMIN, SUPER_ADMIN or USER
pub struct StaffOrUser;
/// Any authenticated role
pub struct AnyRole;

impl RolePolicy for SuperAdminOnly {
    const ALLOWED: RoleSet = RoleSet::SUPER_ADMIN;
}
impl RolePolicy for Staff {
    const ALLOWED: RoleSet = RoleSet::STAFF;
}
impl RolePolicy for SellerOnly {
    const ALLOWED: RoleSet = RoleSet::SELLER;
}
impl RolePolicy for StaffOrUser {
    const ALLOWED: RoleSet = RoleSet::STAFF_OR_USER;
}
impl RolePolicy for AnyRole {
    const ALLOWED: RoleSet = RoleSet::ANY;
}

/// Fails with 403 `FAIL` when `role` is not in `allowed`.
pub fn authorize(role: Role, allowed: RoleSet) -> Result<(), AppError> {
    if allowed.contains(role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(messages::ROLE_NOT_ALLOWED))
    }
}

/// Extractor that yields the caller only when their role passes `P`.
///
/// Requires [`require_auth`](super::require_auth) on the route.
pub struct Authorized<P: RolePolicy> {
    identity: CurrentIdentity,
    _policy: PhantomData<fn() -> P>,
}

impl<P: RolePolicy> Authorized<P> {
    pub fn into_identity(self) -> CurrentIdentity {
        self.identity
    }
}

impl<P: RolePolicy> Deref for Authorized<P> {
    type Target = CurrentIdentity;

    fn deref(&self) -> &Self::Target {
        &self.identity
    }
}

impl<S, P> FromRequestParts<S> for Authorized<P>
where
    S: Send + Sync,
    P: RolePolicy,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = CurrentIdentity::from_request_parts(parts, state).await?;
        authorize(identity.claims.role, P::ALLOWED).inspect_err(|_| {
            tracing::info!(
                sub = %identity.claims.sub,
                role = %identity.claims.role,
                "Role not allowed for route"
            );
        })?;

        Ok(Self {
            identity,
            _policy: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize() {
        assert!(authorize(Role::Admin, Staff::ALLOWED).is_ok());
        assert!(authorize(Role::SuperAdmin, SuperAdminOnly::ALLOWED).is_ok());
        assert!(matches!(
            authorize(Role::Admin, SuperAdminOnly::ALLOWED),
            Err(AppError::Forbidden(_))
        ));
        assert!(authorize(Role::Seller, StaffOrUser::ALLOWED).is_err());
        assert!(authorize(Role::User, AnyRole::ALLOWED).is_ok());
        assert!(authorize(Role::Seller, SellerOnly::ALLOWED).is_ok());
    }
}
