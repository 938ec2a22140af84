pub mod log_utils;
