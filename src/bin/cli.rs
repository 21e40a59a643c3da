//! dhcphosts CLI Client
//!
//! Command-line interface for interacting with a dhcphosts server.

use std::net::Ipv4Addr;
use std::process::ExitCode;

use clap::{Args as ClapArgs, Parser, Subcommand};
use dhcphosts::config::DEFAULT_LISTEN_ADDR;
use dhcphosts::network::Client;
use dhcphosts::store::encode_line;
use dhcphosts::{HostRecord, MacAddr, Result};

/// dhcphosts CLI
#[derive(Parser, Debug)]
#[command(name = "dhcphosts-cli")]
#[command(about = "CLI for dhcphosts static DHCP reservations")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, env = "DHCPHOSTS_SERVER", default_value = DEFAULT_LISTEN_ADDR)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every reservation
    List,

    /// Show one reservation
    Get(Key),

    /// Add a reservation (fails if the MAC or IP is taken)
    Add(RecordArgs),

    /// Replace any reservation holding the MAC or IP
    Update(RecordArgs),

    /// Delete one reservation
    Remove(Key),

    /// Ping the server
    Ping,
}

/// Exactly one of --mac / --ip
#[derive(ClapArgs, Debug)]
struct Key {
    /// Hardware address (aa:bb:cc:dd:ee:ff)
    #[arg(long, conflicts_with = "ip", required_unless_present = "ip")]
    mac: Option<MacAddr>,

    /// IPv4 address
    #[arg(long)]
    ip: Option<Ipv4Addr>,
}

#[derive(ClapArgs, Debug)]
struct RecordArgs {
    /// Hardware address (aa:bb:cc:dd:ee:ff)
    mac: MacAddr,

    /// IPv4 address to reserve
    ip: Ipv4Addr,

    /// Host name
    hostname: String,

    /// Restrict the reservation to one interface
    #[arg(short, long)]
    interface: Option<String>,
}

impl RecordArgs {
    fn into_record(self) -> HostRecord {
        let record = HostRecord::new(self.mac, self.ip, self.hostname);
        match self.interface {
            Some(interface) => record.with_interface(interface),
            None => record,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let mut client = Client::connect(&args.server)?;

    match args.command {
        Commands::List => {
            for record in client.list()? {
                println!("{}", encode_line(&record));
            }
        }
        Commands::Get(key) => {
            let found = match (key.mac, key.ip) {
                (Some(mac), _) => client.get_by_mac(mac)?,
                (None, Some(ip)) => client.get_by_ip(ip)?,
                (None, None) => unreachable!("clap requires --mac or --ip"),
            };
            match found {
                Some(record) => println!("{}", encode_line(&record)),
                None => {
                    eprintln!("No static host found");
                    return Ok(ExitCode::from(2));
                }
            }
        }
        Commands::Add(record) => {
            let record = record.into_record();
            client.insert(&record)?;
            println!("{}", encode_line(&record));
        }
        Commands::Update(record) => {
            let record = record.into_record();
            for old in client.update(&record)? {
                println!("- {}", encode_line(&old));
            }
            println!("+ {}", encode_line(&record));
        }
        Commands::Remove(key) => {
            let removed = match (key.mac, key.ip) {
                (Some(mac), _) => client.remove_by_mac(mac)?,
                (None, Some(ip)) => client.remove_by_ip(ip)?,
                (None, None) => unreachable!("clap requires --mac or --ip"),
            };
            match removed {
                Some(record) => println!("- {}", encode_line(&record)),
                None => println!("Nothing to delete"),
            }
        }
        Commands::Ping => {
            client.ping()?;
            println!("PONG");
        }
    }

    Ok(ExitCode::SUCCESS)
}
