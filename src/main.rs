use clap::Parser;
use pushgate::cli::{Cli, Output};
use pushgate::error::PushGateError;

#[tokio::main]
async fn main() {
    // Any rejected invocation is exit 1 like every other failure; --help and
    // --version still exit 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };
    let quiet = cli.quiet;

    // The workspace is already gone by the time an error reaches here
    if let Err(err) = cli.run().await {
        let output = Output::new(false, quiet);
        match err.downcast_ref::<PushGateError>() {
            Some(failure) => output.failure(failure),
            None => output.error(&format!("{err:#}")),
        }
        std::process::exit(1);
    }
}
