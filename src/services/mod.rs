pub mod auth;
pub mod complaint;
pub mod email;
pub mod management;
pub mod measure;
pub mod notification;
pub mod storage;
pub mod technical_report;
