//! Command dispatch: bridges CLI args -> core facade -> output formatting.

pub mod config_cmd;
pub mod fans;
pub mod temps;

use ilofan_core::FanController;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &FanController,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Fans(args) => fans::handle(controller, args, global).await,
        Command::Temps => temps::handle(controller, global).await,
        Command::Config(_) | Command::Completions(_) => {
            unreachable!("handled before controller construction")
        }
    }
}
