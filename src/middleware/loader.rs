use async_trait::async_trait;
use std::sync::Arc;

use super::{LoadedResource, RequestContext, Stage};
use crate::database::Store;
use crate::error::ApiError;

pub const NOT_FOUND_MESSAGE: &str = "ERROR 404, Resource with given ID is NOT found";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Task,
}

/// Fetches the entity named by the (already validated) path id
#[derive(Clone)]
pub struct ResourceLoader {
    store: Arc<dyn Store>,
    kind: EntityKind,
}

impl ResourceLoader {
    pub fn new(store: Arc<dyn Store>, kind: EntityKind) -> Self {
        Self { store, kind }
    }
}

#[async_trait]
impl Stage for ResourceLoader {
    fn name(&self) -> &'static str {
        match self.kind {
            EntityKind::User => "load-user",
            EntityKind::Task => "load-task",
        }
    }

    async fn check(&self, ctx: &mut RequestContext) -> Result<(), ApiError> {
        let id = ctx
            .id
            .ok_or_else(|| ApiError::internal("resource loader ran before identifier validation"))?;

        let resource = match self.kind {
            EntityKind::User => self.store.find_user(id).await?.map(LoadedResource::User),
            EntityKind::Task => self.store.find_task(id).await?.map(LoadedResource::Task),
        };

        match resource {
            Some(resource) => {
                ctx.resource = Some(resource);
                Ok(())
            }
            None => Err(ApiError::not_found(NOT_FOUND_MESSAGE)),
        }
    }
}
