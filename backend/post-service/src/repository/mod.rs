mod memory_repository;
mod postgres_repository;
pub mod schema;
mod r#trait;
mod validated_repository;

pub use memory_repository::InMemoryPostRepository;
pub use postgres_repository::PostgresPostRepository;
pub use r#trait::PostRepository;
pub use validated_repository::ValidatedPostRepository;

#[cfg(test)]
pub use r#trait::MockPostRepository;
