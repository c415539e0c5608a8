use std::collections::BTreeMap;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "waypoint-probe")]
#[command(about = "Sends requests and CORS preflights to a waypoint server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Extra request headers as `name:value`.
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a CORS preflight (OPTIONS) for a path
    Preflight {
        path: String,
        /// Origin header to send
        #[arg(long, default_value = "http://localhost")]
        origin: String,
    },
    /// Send a request and print status, headers and body
    Request {
        path: String,
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,
        /// JSON body
        #[arg(short, long)]
        data: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let headers = parse_headers(&cli.headers)?;

    let res = match cli.command {
        Commands::Preflight { path, origin } => {
            client
                .request(Method::OPTIONS, format!("{}{}", cli.url, path))
                .headers(headers)
                .header("Origin", origin)
                .send()
                .await?
        }
        Commands::Request { path, method, data } => {
            let method = Method::from_bytes(method.to_uppercase().as_bytes())?;
            let mut req = client
                .request(method, format!("{}{}", cli.url, path))
                .headers(headers);
            if let Some(data) = data {
                let body: Value = serde_json::from_str(&data)?;
                req = req.json(&body);
            }
            req.send().await?
        }
    };

    print_response(res).await
}

fn parse_headers(raw: &[String]) -> Result<HeaderMap, Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    for entry in raw {
        let (name, value) = entry
            .split_once(':')
            .ok_or_else(|| format!("header '{}' is not name:value", entry))?;
        headers.insert(
            HeaderName::from_bytes(name.trim().as_bytes())?,
            HeaderValue::from_str(value.trim())?,
        );
    }
    Ok(headers)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let headers: BTreeMap<String, String> = res
        .headers()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
        .collect();

    let text = res.text().await?;
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };

    let report = json!({
        "status": status.as_u16(),
        "headers": headers,
        "body": body,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
