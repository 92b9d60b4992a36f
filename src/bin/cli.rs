//! KCVStore CLI Client
//!
//! Command-line interface for interacting with KCVStore.

use clap::{Parser, Subcommand};
use kcvstore::network::Client;
use kcvstore::Result;

/// KCVStore CLI
#[derive(Parser, Debug)]
#[command(name = "kcvstore-cli")]
#[command(about = "CLI for KCVStore key/column/value store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7070")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all keys
    Keys,

    /// Get the value at a key/column
    Get {
        key: String,
        col: String,
    },

    /// Get all columns of a key, sorted
    GetKey {
        key: String,
    },

    /// Get an inclusive slice of a key's columns
    Slice {
        key: String,

        /// First column (open if omitted)
        #[arg(long)]
        start: Option<String>,

        /// Last column (open if omitted)
        #[arg(long)]
        stop: Option<String>,
    },

    /// Set the value at a key/column
    Set {
        key: String,
        col: String,
        val: String,
    },

    /// Delete one column
    Del {
        key: String,
        col: String,
    },

    /// Delete a key and all its columns
    DelKey {
        key: String,
    },

    /// Ping the server
    Ping,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut client = Client::connect(args.server.as_str())?;

    match args.command {
        Commands::Keys => {
            let mut keys = client.get_keys()?;
            keys.sort();
            for key in keys {
                println!("{}", String::from_utf8_lossy(&key));
            }
        }
        Commands::Get { key, col } => match client.get(key.as_bytes(), col.as_bytes())? {
            Some(val) => println!("{}", String::from_utf8_lossy(&val)),
            None => println!("(nil)"),
        },
        Commands::GetKey { key } => {
            print_columns(&client.get_key(key.as_bytes())?);
        }
        Commands::Slice { key, start, stop } => {
            let columns = client.get_slice(
                key.as_bytes(),
                start.as_deref().map(str::as_bytes),
                stop.as_deref().map(str::as_bytes),
            )?;
            print_columns(&columns);
        }
        Commands::Set { key, col, val } => {
            client.set(key.as_bytes(), col.as_bytes(), val.as_bytes())?;
            println!("OK");
        }
        Commands::Del { key, col } => {
            client.delete(key.as_bytes(), col.as_bytes())?;
            println!("OK");
        }
        Commands::DelKey { key } => {
            client.delete_key(key.as_bytes())?;
            println!("OK");
        }
        Commands::Ping => {
            client.ping()?;
            println!("PONG");
        }
    }

    Ok(())
}

fn print_columns(columns: &[(Vec<u8>, Vec<u8>)]) {
    for (col, val) in columns {
        println!(
            "{}\t{}",
            String::from_utf8_lossy(col),
            String::from_utf8_lossy(val)
        );
    }
}
