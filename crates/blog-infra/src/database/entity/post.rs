//! Post entity for SeaORM.

use sea_orm::entity::prelude::*;

use blog_core::domain::{Author, Post};
use blog_core::error::RepoError;

use super::user;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub author_id: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Build a domain post from a post row and its joined author row.
///
/// The foreign key guarantees an author; a missing one means the join was wrong.
pub fn into_domain(model: Model, author: Option<user::Model>) -> Result<Post, RepoError> {
    let author = author
        .ok_or_else(|| RepoError::Query(format!("post {} has no author row", model.id)))?;

    Ok(Post {
        id: model.id,
        title: model.title,
        content: model.content,
        author: Author {
            id: author.id,
            username: author.username,
        },
        created_at: model.created_at.into(),
    })
}
