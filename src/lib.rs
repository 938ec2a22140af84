pub mod app;
pub mod args;
pub mod config;
pub mod errors;
pub mod infra {
    pub mod interrupt_adapter;
}
pub mod interfaces;
pub mod manifest;
pub mod storage;
pub mod utils;

pub use app::run_app;
pub use args::Args;
