pub mod kv;
pub mod opentdb;

pub use kv::SqliteKvAdapter;
pub use opentdb::OpenTdbAdapter;
