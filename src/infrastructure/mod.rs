pub mod config;
pub mod git;
pub mod llm_clients;
pub mod response;
pub mod storage;
