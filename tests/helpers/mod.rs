#![allow(dead_code)]

pub mod mock_store;
pub mod mock_transport;

pub const TEST_BUCKET: &str = "test-bucket";
pub const TEST_ACCESS_KEY: &str = "testAccessKey";
pub const TEST_SECRET_KEY: &str = "testSecretKey";
