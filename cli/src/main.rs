mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, block, show, unblock};
use terminal::{logging, print};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.args().verbose);

    let result = match &commands.command {
        Commands::Block(args) => {
            print::header(&format!("blocking {}", args.cluster));
            block::block(args).await
        }
        Commands::Unblock(args) => {
            print::header(&format!("unblocking {}", args.cluster));
            unblock::unblock(args).await
        }
        Commands::Show(args) => show::show(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
