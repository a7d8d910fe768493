pub mod answers;
pub mod config_cmd;
pub mod records;
pub mod serve;
