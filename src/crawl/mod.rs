pub mod crawler;
pub mod error;
pub mod fetcher;
pub mod inventory;
