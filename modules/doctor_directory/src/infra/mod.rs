pub mod accounts;
pub mod storage;
