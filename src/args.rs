use std::num::NonZeroUsize;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Maximum number of bytes buffered between stdin and stdout
    #[clap(short = 'c', long, default_value = "65536")]
    pub capacity: NonZeroUsize,

    /// Seconds without any data before the relay gives up
    #[clap(short = 't', long, default_value = "60")]
    pub timeout: u64,
}
