use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "highlight-cli")]
#[command(about = "Command line client for the highlight service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the supported formatters
    Formatters,
    /// Highlight code read from a file or stdin
    Highlight {
        /// Formatter name or alias
        formatter: String,

        /// Lexer name; the server falls back to plain text
        #[arg(short, long)]
        lexer: Option<String>,

        /// File to highlight instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Formatters => {
            let res = client
                .get(format!("{}/api/supported/formatters", cli.url))
                .send()
                .await?;
            if let Some(res) = check(res).await? {
                let json: Value = res.json().await?;
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
        }
        Commands::Highlight { formatter, lexer, file } => {
            let code = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut code = String::new();
                    std::io::stdin().read_to_string(&mut code)?;
                    code
                }
            };

            let mut form = vec![("code", code)];
            if let Some(lexer) = lexer {
                form.push(("lexer", lexer));
            }

            let res = client
                .post(format!("{}/api/formatter/{}", cli.url, formatter))
                .form(&form)
                .send()
                .await?;
            if let Some(res) = check(res).await? {
                print!("{}", res.text().await?);
            }
        }
    }

    Ok(())
}

/// The response when successful; otherwise report it and return `None`.
async fn check(res: reqwest::Response) -> Result<Option<reqwest::Response>, Box<dyn std::error::Error>> {
    let status = res.status();
    if status.is_success() {
        return Ok(Some(res));
    }

    eprintln!("Error: service returned status {}", status);
    if let Ok(text) = res.text().await {
        eprintln!("Response: {}", text);
    }
    Ok(None)
}
