//! Business logic services

pub mod auth;
pub mod catalog;
pub mod lending;
pub mod members;
pub mod reports;

use crate::{config::LendingConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub members: members::MembersService,
    pub lending: lending::LendingService,
    pub reports: reports::ReportsService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, lending: LendingConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            members: members::MembersService::new(repository.clone()),
            lending: lending::LendingService::new(repository.clone(), lending),
            reports: reports::ReportsService::new(repository.clone(), lending),
            repository,
        }
    }
}
