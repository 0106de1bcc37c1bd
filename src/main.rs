//! Headless runner for the Bezy contour editing engine.
//!
//! The enjoyment of one's tools is an essential ingredient of successful work.
//! — Donald Knuth

use bezy_edit::core;

fn main() {
    let cli_args = core::platform::get_cli_args();
    if let Err(error) = core::runner::run_app(cli_args) {
        core::platform::handle_error(error);
    }
}
