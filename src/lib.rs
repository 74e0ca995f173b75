pub mod table;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "frontend")]
pub mod frontend;
