mod cli;
mod commands;
mod constants;
mod error;
mod market;
mod models;
mod providers;
mod server;
mod utils;

fn main() {
    cli::run();
}
