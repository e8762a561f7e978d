pub mod bullet;
pub mod job;
pub mod user;
