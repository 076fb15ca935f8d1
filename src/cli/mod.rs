mod materials;
mod root;

pub use materials::MaterialCommand;
pub use root::{Cli, Commands};
