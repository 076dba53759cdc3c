use dbconn::{ConnectionManager, DbConnError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

const USAGE: &str = "Usage: dbconn [--config <path>] list
       dbconn [--config <path>] url <name> [--show-password]";

#[derive(Debug, PartialEq)]
enum Command {
    List,
    Url { name: String, show_password: bool },
}

#[derive(Debug, PartialEq)]
struct Cli {
    config: Option<PathBuf>,
    command: Command,
}

fn parse_args(args: &[String]) -> Result<Cli, String> {
    let mut config = None;
    let mut show_password = false;
    let mut positional = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = iter.next().ok_or("--config requires a path")?;
                config = Some(PathBuf::from(path));
            }
            "--show-password" => show_password = true,
            other if other.starts_with('-') => return Err(format!("Unknown option: {}", other)),
            other => positional.push(other.to_string()),
        }
    }

    let command = match positional.as_slice() {
        [cmd] if cmd == "list" => Command::List,
        [cmd, name] if cmd == "url" => Command::Url {
            name: name.clone(),
            show_password,
        },
        _ => return Err(USAGE.to_string()),
    };

    Ok(Cli { config, command })
}

fn run(cli: Cli) -> Result<(), DbConnError> {
    let manager = ConnectionManager::new(cli.config.as_deref())?;
    info!("Using connection file {:?}", manager.config().path());

    match cli.command {
        Command::List => {
            for name in manager.connection_names() {
                println!("{}", name);
            }
        }
        Command::Url {
            name,
            show_password,
        } => {
            let url = manager.connection_url(&name)?;
            if show_password {
                println!("{}", url.as_str());
            } else {
                println!("{}", url.redacted());
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
