#![forbid(unsafe_code)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

//! # Chroma CLI
//!
//! Command-line front end for [`chroma_palette`].
//!
//! ## Usage
//!
//! ```bash
//! chroma generate wall.png              # Lua palette on stdout
//! chroma generate wall.png -o pal.json  # JSON file
//! chroma rules                          # default rule table as TOML
//! chroma convert '#3366cc' --to hsl     # hsl(0.6111, 0.6000, 0.5000)
//! chroma classify '#1a1a1a'             # black
//! ```

pub mod cli;
pub mod commands;
pub mod logging;

pub use cli::{Cli, Command};
pub use commands::{apply_overrides, describe, load_config, run};
pub use logging::init_logging;
