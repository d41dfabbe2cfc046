pub mod factories;
pub mod mocks;
