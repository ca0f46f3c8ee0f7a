pub mod json_file;
pub mod mock;
pub mod system;
