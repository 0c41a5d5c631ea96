pub mod abi;
pub mod reader;
pub mod types;
