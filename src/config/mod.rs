pub mod database;
pub mod email;
pub mod jwt;
pub mod rate_limit;
pub mod storage;
