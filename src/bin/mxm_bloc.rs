//! `mxm_bloc`: tiled kernel swept over block sizes.
//!
//! ```bash
//! cargo run --release --bin mxm_bloc -- 512 2 16 32 64
//! ```

use std::process::ExitCode;

use matbench::cli::main_with;
use matbench::Mode;

fn main() -> ExitCode {
    main_with(Mode::Tiled, "mxm_bloc", std::env::args().skip(1))
}
