//! Storage layer abstraction trait definition

mod history_repository;
mod result_repository;

pub use history_repository::HistoryRepository;
pub use result_repository::ResultRepository;
