mod loop_handler;

pub use loop_handler::{build_headless_report, run, run_headless, HeadlessReport};
