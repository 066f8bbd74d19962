// Infrastructure layer module
// Contains database adapters and demo-data seeding
// Follows Hexagonal Architecture

pub mod repositories;
pub mod seed;
