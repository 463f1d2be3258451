//! MongoDB access layer with change dispatch
//!
//! Collections are wrapped so that every mutating operation reports the
//! affected document ids to registered listeners. The [`Db`] façade binds one
//! wrapped [`Collection`] per known collection name.

pub mod collection;
pub mod db;
pub mod dispatch;
pub mod processor;
pub mod projection;

pub use collection::Collection;
pub use db::{check_server_version, default_bindings, CollectionBinding, Db};
pub use dispatch::{ChangeDispatcher, ChangeEvent, ChangeListener, Operation};
pub use processor::{base_processor, Processor};
pub use projection::Projection;
