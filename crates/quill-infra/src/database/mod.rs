//! Database connection management and SeaORM repositories.

mod connections;
pub mod entity;
pub mod postgres_repo;

pub use connections::{DatabaseConfig, Db};
pub use sea_orm::DbErr;
pub use postgres_repo::{
    PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository,
};

#[cfg(test)]
mod tests;
