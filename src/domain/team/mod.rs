// Team domain module

pub mod team;

pub use team::{NewTeam, Team};
