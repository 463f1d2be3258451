//! Virion Storage Library
//!
//! Store-facing support for the analysis backend: a reactive MongoDB
//! collection wrapper with change dispatch, a Redis façade with a supervised
//! keep-alive, history reverse-diff replay, trim caches, and the NCBI BLAST
//! integration.

pub mod analyses;
pub mod blast;
pub mod caches;
pub mod config;
pub mod error;
pub mod history;
pub mod mongo;
pub mod otus;
pub mod redis;
pub mod samples;
pub mod subtractions;

pub use config::{DatabaseConfig, RedisConfig, StorageConfig};
pub use error::{Result, StorageError};
pub use mongo::{
    ChangeDispatcher, ChangeEvent, ChangeListener, Collection, CollectionBinding, Db, Operation,
    Processor, Projection,
};
pub use redis::{Redis, RedisValue};
