#![forbid(unsafe_code)]

pub mod demo;
pub mod memory;
pub mod repository;
pub mod rest;

pub use memory::InMemoryRepository;
pub use repository::{Storage, StorageError};
pub use rest::{RestConfig, RestInitError, RestRepository};
