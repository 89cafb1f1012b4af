//! Integration tests for the gym service and its storage backends.

mod common;
mod file_backend_test;
mod memory_backend_test;
mod scenarios;
mod sqlite_backend_test;
