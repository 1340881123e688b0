pub mod profile;
pub mod role;
pub mod user;
