//! Access policies.
//!
//! Each route names one [`Policy`]; the [`Authorizer`] stage evaluates it
//! against the verified identity and, for per-resource policies, the entity
//! the loader fetched. Evaluation is a pure function so the whole decision
//! matrix can be tested without a request.

use async_trait::async_trait;

use super::{LoadedResource, RequestContext, Stage};
use crate::auth::IdentityClaim;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Target user is the caller, or the caller is an administrator
    SelfOrAdmin,
    /// Target user is the caller; administrators get no exemption
    SelfOnly,
    /// Target task is owned by the caller; administrators get no exemption
    TaskOwnerOnly,
    /// Caller is an administrator
    AdminOnly,
}

impl Policy {
    pub fn evaluate(
        self,
        identity: Option<&IdentityClaim>,
        resource: Option<&LoadedResource>,
    ) -> Result<(), ApiError> {
        let identity = identity.ok_or_else(|| ApiError::unauthenticated("Unauthorized"))?;

        match self {
            Policy::AdminOnly => {
                if identity.is_admin {
                    Ok(())
                } else {
                    Err(ApiError::forbidden())
                }
            }
            Policy::SelfOrAdmin | Policy::SelfOnly => {
                let user = match resource {
                    Some(LoadedResource::User(user)) => user,
                    _ => return Err(ApiError::not_found("User not found")),
                };
                if self == Policy::SelfOrAdmin && identity.is_admin {
                    return Ok(());
                }
                if user.id == identity.subject {
                    Ok(())
                } else {
                    Err(ApiError::forbidden())
                }
            }
            Policy::TaskOwnerOnly => {
                let task = match resource {
                    Some(LoadedResource::Task(task)) => task,
                    _ => return Err(ApiError::not_found("Task not found")),
                };
                if task.is_owned_by(identity.subject) {
                    Ok(())
                } else {
                    Err(ApiError::forbidden())
                }
            }
        }
    }
}

/// Pipeline stage wrapping a [`Policy`]
#[derive(Debug, Clone, Copy)]
pub struct Authorizer(pub Policy);

#[async_trait]
impl Stage for Authorizer {
    fn name(&self) -> &'static str {
        match self.0 {
            Policy::SelfOrAdmin => "self-or-admin",
            Policy::SelfOnly => "self-only",
            Policy::TaskOwnerOnly => "task-owner-only",
            Policy::AdminOnly => "admin-only",
        }
    }

    async fn check(&self, ctx: &mut RequestContext) -> Result<(), ApiError> {
        let verdict = self.0.evaluate(ctx.identity.as_ref(), ctx.resource.as_ref());
        if let (Err(ApiError::Forbidden(_)), Some(identity)) = (&verdict, &ctx.identity) {
            tracing::info!("Denied {} for user {} ({})", self.name(), identity.username, identity.subject);
        }
        verdict
    }
}
