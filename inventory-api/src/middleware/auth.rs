//! Request authorization gate.
//!
//! Composes the token service (stateless signature/expiry validation) with
//! the revocation registry (shared state) and per-scope capability checks.
//! The gate itself has no side effects; logout and refresh revoke inside
//! their own handlers.
//!
//! Registry unavailability denies the request (fail closed): an outage
//! must not silently grant access.

use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::metrics;

fn reject(err: ApiError) -> Error {
    metrics::record_auth_rejection(err.code());
    err.into()
}

/// Capability a protected scope demands from the presented token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRequirement {
    /// Access-type token (refresh tokens are rejected).
    Access,
    /// Access-type token minted directly from a password login.
    Fresh,
    /// Refresh-type token (the `/refresh` exchange).
    Refresh,
}

/// Authenticated token context, inserted into request extensions by the
/// gate and read by handlers through the `FromRequest` impl.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub jti: String,
    pub fresh: bool,
    pub is_admin: bool,
    /// Unix timestamp of natural expiry; bounds revocation-entry TTLs.
    pub expires_at: i64,
}

impl AuthContext {
    pub fn remaining_ttl_secs(&self) -> u64 {
        (self.expires_at - chrono::Utc::now().timestamp()).max(0) as u64
    }
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthContext>().cloned() {
            Some(ctx) => ready(Ok(ctx)),
            None => ready(Err(ApiError::AuthorizationRequired.into())),
        }
    }
}

/// Authorization gate middleware factory.
pub struct AuthGate {
    requirement: TokenRequirement,
}

impl AuthGate {
    pub fn access() -> Self {
        Self {
            requirement: TokenRequirement::Access,
        }
    }

    pub fn fresh() -> Self {
        Self {
            requirement: TokenRequirement::Fresh,
        }
    }

    pub fn refresh() -> Self {
        Self {
            requirement: TokenRequirement::Refresh,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGateService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(AuthGateService {
            service: Rc::new(service),
            requirement: self.requirement,
        }))
    }
}

pub struct AuthGateService<S> {
    service: Rc<S>,
    requirement: TokenRequirement,
}

impl<S, B> Service<ServiceRequest> for AuthGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let requirement = self.requirement;

        Box::pin(async move {
            // Extract header data before any mutable access to extensions.
            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .map(|h| h.to_string());

            let Some(auth_header) = auth_header else {
                return Err(reject(ApiError::AuthorizationRequired));
            };

            let Some(token) = auth_header.strip_prefix("Bearer ") else {
                return Err(reject(ApiError::AuthorizationRequired));
            };

            let state = req
                .app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| ApiError::Internal("AppState not configured".to_string()))?;

            // 1. Signature and expiry.
            let claims = state.tokens.decode(token).map_err(reject)?;

            // 2. Revocation. A store failure denies the request.
            match state.revocation.is_revoked(&claims.jti).await {
                Ok(true) => {
                    tracing::warn!(jti = %claims.jti, "Attempt to use revoked token");
                    return Err(reject(ApiError::TokenRevoked));
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(error = %e, "Revocation check failed; denying request");
                    return Err(reject(ApiError::UpstreamUnavailable));
                }
            }

            // 3. Type and freshness per scope.
            match requirement {
                TokenRequirement::Access if claims.is_refresh() => {
                    return Err(reject(ApiError::TokenInvalid));
                }
                TokenRequirement::Fresh => {
                    if claims.is_refresh() {
                        return Err(reject(ApiError::TokenInvalid));
                    }
                    claims.require_fresh().map_err(reject)?;
                }
                TokenRequirement::Refresh if !claims.is_refresh() => {
                    return Err(reject(ApiError::TokenInvalid));
                }
                _ => {}
            }

            let ctx = AuthContext {
                user_id: claims.user_id()?,
                jti: claims.jti.clone(),
                fresh: claims.fresh,
                is_admin: claims.is_admin,
                expires_at: claims.exp,
            };

            req.extensions_mut().insert(ctx);

            service.call(req).await
        })
    }
}
