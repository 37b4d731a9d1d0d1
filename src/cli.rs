use clap::{Parser, Subcommand};
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(name = "otaku")]
#[command(about = "Manga catalog and reader API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Server(ServerArgs),
    /// Create the database schema (and demo content if enabled), then exit
    InitDb,
}

#[derive(clap::Args, Debug)]
pub struct ServerArgs {
    /// Address to bind to; overrides `server.bind_addr`
    #[arg(long)]
    pub address: Option<SocketAddr>,
}
