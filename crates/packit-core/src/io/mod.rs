//! I/O utilities shared by the container sinks.

pub mod counting;

pub use counting::CountingReader;
