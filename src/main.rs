use clap::Parser;
use std::process::ExitCode;

use update_server::server::signal;
use update_server::{banner, logger, net, Cli, Config, Result, Server};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[FATAL] {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let cfg = Config::load_from(&cli.config, &cli.overrides())?;
    logger::init(&cfg).map_err(update_server::ServerError::Logger)?;

    // Worker thread count follows the config, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<()> {
    let server = Server::bind(cfg)?;
    let addr = server.local_addr()?;

    logger::log_server_start(&addr, &server.state().config);
    banner::print(server.state(), addr.port(), &net::get_local_ip()).await;

    server
        .run(async {
            let name = signal::wait_for_shutdown().await;
            logger::log_signal_received(name);
        })
        .await?;

    banner::print_stopped();
    Ok(())
}
