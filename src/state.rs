use std::sync::Arc;

use crate::auth::{TokenError, TokenService};
use crate::config::AppConfig;
use crate::database::Store;
use crate::middleware::{
    Authorizer, BodyValidator, EntityKind, IdentifierValidator, Pipeline, Policy, ResourceLoader, TokenVerifier,
};
use crate::schema::tables;

/// One pipeline per route, assembled once at startup
pub struct RoutePipelines {
    pub authenticate: Pipeline,
    pub register: Pipeline,
    pub list_users: Pipeline,
    pub show_user: Pipeline,
    pub update_user: Pipeline,
    pub delete_user: Pipeline,
    pub set_admin: Pipeline,
    pub list_tasks: Pipeline,
    pub create_task: Pipeline,
    pub update_task: Pipeline,
    pub delete_task: Pipeline,
}

impl RoutePipelines {
    pub fn build(tokens: &TokenService, store: &Arc<dyn Store>) -> Self {
        let token = || TokenVerifier::new(tokens.clone());
        let load = |kind| ResourceLoader::new(store.clone(), kind);

        Self {
            authenticate: Pipeline::new().then(BodyValidator::new(tables::credentials())),
            register: Pipeline::new().then(BodyValidator::new(tables::user_create())),
            list_users: Pipeline::new().then(token()).then(Authorizer(Policy::AdminOnly)),
            // The id is checked before the token here, unlike every other route
            show_user: Pipeline::new()
                .then(IdentifierValidator)
                .then(token())
                .then(load(EntityKind::User))
                .then(Authorizer(Policy::SelfOrAdmin)),
            update_user: Pipeline::new()
                .then(token())
                .then(IdentifierValidator)
                .then(load(EntityKind::User))
                .then(BodyValidator::new(tables::user_update()))
                .then(Authorizer(Policy::SelfOnly)),
            delete_user: Pipeline::new()
                .then(token())
                .then(IdentifierValidator)
                .then(load(EntityKind::User))
                .then(Authorizer(Policy::SelfOrAdmin)),
            set_admin: Pipeline::new()
                .then(token())
                .then(Authorizer(Policy::AdminOnly))
                .then(IdentifierValidator)
                .then(load(EntityKind::User))
                .then(BodyValidator::new(tables::set_admin())),
            list_tasks: Pipeline::new().then(token()),
            create_task: Pipeline::new()
                .then(token())
                .then(BodyValidator::new(tables::task_create())),
            update_task: Pipeline::new()
                .then(token())
                .then(IdentifierValidator)
                .then(load(EntityKind::Task))
                .then(BodyValidator::new(tables::task_update()))
                .then(Authorizer(Policy::TaskOwnerOnly)),
            delete_task: Pipeline::new()
                .then(token())
                .then(IdentifierValidator)
                .then(load(EntityKind::Task))
                .then(Authorizer(Policy::TaskOwnerOnly)),
        }
    }
}

/// Process-wide state handed to every route
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub tokens: TokenService,
    pub pipelines: Arc<RoutePipelines>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Result<Self, TokenError> {
        let tokens = TokenService::new(&config.security)?;
        let pipelines = RoutePipelines::build(&tokens, &store);

        Ok(Self {
            config: Arc::new(config),
            store,
            tokens,
            pipelines: Arc::new(pipelines),
        })
    }
}
