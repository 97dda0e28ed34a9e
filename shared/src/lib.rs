pub mod blog;
pub mod club;
pub mod user;
