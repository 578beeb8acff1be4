use std::process::ExitCode;

use claude_profile::{
    cli::{self, Invocation},
    logging,
    ui::Ui,
};

fn main() -> ExitCode {
    let (cli, command) = match cli::parse_args(std::env::args_os()) {
        Invocation::Run { cli, command } => (cli, command),
        Invocation::Usage(text) => {
            print!("{text}");
            return ExitCode::SUCCESS;
        }
    };

    logging::init(cli.verbose);
    let ui = Ui::new(cli.color, cli.no_color);

    match cli::dispatch(cli, command, &ui) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui.err(format!("{e:#}"));
            ExitCode::from(cli::exit_code(&e))
        }
    }
}
