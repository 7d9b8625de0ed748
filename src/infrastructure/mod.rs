pub mod clock;
pub mod in_memory;
pub mod oracle;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
