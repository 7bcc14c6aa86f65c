//! Members repository for database operations

use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::member::{CreateMember, Member, MemberQuery, MemberStatus},
};

#[derive(Clone)]
pub struct MembersRepository {
    pool: Pool<Sqlite>,
}

impl MembersRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get member by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Member> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    /// Register a new member
    pub async fn create(&self, member: &CreateMember) -> AppResult<Member> {
        let created = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (name, email, phone, address, membership_date, status)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&member.name)
        .bind(&member.email)
        .bind(&member.phone)
        .bind(&member.address)
        .bind(Utc::now())
        .bind(MemberStatus::Active)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// List members, optionally filtered by a name substring
    pub async fn search(&self, query: &MemberQuery) -> AppResult<Vec<Member>> {
        let members = match query.name.as_deref() {
            Some(name) => {
                sqlx::query_as::<_, Member>(
                    "SELECT * FROM members WHERE name LIKE ? ORDER BY name",
                )
                .bind(format!("%{}%", name))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Member>("SELECT * FROM members ORDER BY name")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(members)
    }

    /// Count registered members
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
