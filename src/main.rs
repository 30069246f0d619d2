#[macro_use]
extern crate tracing;

use dotenvy::dotenv;

mod config;
mod error;
mod map;
mod trace;
mod tracker;
mod ui;

pub use config::CONFIG;
pub use error::Error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    launch_info();
    dotenv().ok();
    if let Err(err) = trace::init(&CONFIG.log) {
        panic!("{}", err);
    }
    if let Err(err) = tracker::launch(&CONFIG).await {
        error!(code = err.code(), "{}", err);
        std::process::exit(1);
    }
}

fn launch_info() {
    eprintln!();
    eprintln!(
        "=================== Starting IP Tracker {} ===================",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!();
}
