pub mod data_process;
pub mod root;
pub mod user_process;
