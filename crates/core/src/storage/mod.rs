//! Storage module - typed repository for the state the engine owns.

mod codec;
mod json_file_repository;
mod memory_repository;
mod storage_traits;

pub use codec::{AUTO_CONTRIBUTION_RULES_KEY, STREAK_STATE_KEY};
pub use json_file_repository::JsonFileEngineStateRepository;
pub use memory_repository::InMemoryEngineStateRepository;
pub use storage_traits::EngineStateRepositoryTrait;
