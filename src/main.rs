//! `mxm`: natural (`ijk`) versus reordered (`ikj`) loop order.
//!
//! ```bash
//! cargo run --release --bin mxm -- 1024 3
//! ```

use std::process::ExitCode;

use matbench::cli::main_with;
use matbench::Mode;

fn main() -> ExitCode {
    main_with(Mode::LoopOrder, "mxm", std::env::args().skip(1))
}
