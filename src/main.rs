mod args;

use std::time::Duration;

use clap::Parser;

use byte_stream::io::relay;

use args::Args;

#[tokio::main]
async fn main() {
    env_logger::init();

    let args = Args::parse();
    let capacity = args.capacity.get();
    let timeout = Duration::from_secs(args.timeout);

    log::debug!(
        "Relaying stdin to stdout, capacity {} bytes, timeout {} seconds",
        capacity,
        args.timeout
    );

    let mut stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        res = relay(&mut stdin, &mut stdout, capacity, timeout) => {
            match res {
                Ok(n) => log::info!("Relayed {} bytes", n),
                Err(e) => log::error!("Unable to relay stdin to stdout: {}", e),
            }
        },
    }
}
