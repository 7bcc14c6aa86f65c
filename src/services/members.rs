//! Member registry service

use validator::Validate;

use crate::{
    error::AppResult,
    models::member::{CreateMember, Member, MemberQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
}

impl MembersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn register(&self, member: CreateMember) -> AppResult<Member> {
        member.validate()?;
        self.repository.members.create(&member).await
    }

    pub async fn get(&self, id: i64) -> AppResult<Member> {
        self.repository.members.get_by_id(id).await
    }

    pub async fn search(&self, query: &MemberQuery) -> AppResult<Vec<Member>> {
        self.repository.members.search(query).await
    }
}
