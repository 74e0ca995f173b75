pub mod list;

#[cfg(test)]
#[path = "list_test.rs"]
mod list_test;
