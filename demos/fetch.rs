//! Command-line front end for the fetch pipeline.
//!
//! Fetches one URL and prints a summary followed by the decoded text (or the
//! body size for binary content).
//!
//! ```bash
//! cargo run --example fetch -- https://example.com/
//! cargo run --example fetch -- --socks5 127.0.0.1:1080 --user u --password p https://example.com/
//! cargo run --example fetch -- --method post --form q=rust --form page=2 https://example.com/search
//! ```

use std::process;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use http_fetch::{
    build_direct, build_http_proxy, build_socks5_proxy, fetch_with_config, init_logger_with,
    Credentials, FetchConfig, FetchError, HttpClient, LogFormat, LogLevel, Method, Request,
    TransportConfig,
};

#[derive(Debug, Parser)]
#[command(name = "fetch", about = "Fetch a URL and print its decoded text")]
struct Args {
    /// URL to fetch (http or https)
    url: String,

    /// HTTP method
    #[arg(long, default_value_t = Method::Get)]
    method: Method,

    /// HTTP proxy URL, e.g. http://127.0.0.1:8080
    #[arg(long, conflicts_with = "socks5")]
    proxy: Option<String>,

    /// SOCKS5 proxy address as host:port
    #[arg(long)]
    socks5: Option<String>,

    /// SOCKS5 username
    #[arg(long, requires = "socks5")]
    user: Option<String>,

    /// SOCKS5 password
    #[arg(long, requires = "user", default_value = "")]
    password: String,

    /// Extra header as `Name: value` (repeatable)
    #[arg(long = "header", short = 'H')]
    headers: Vec<String>,

    /// Form field as `name=value`, sent for POST (repeatable)
    #[arg(long = "form", short = 'F')]
    form: Vec<String>,

    /// User-Agent override
    #[arg(long)]
    user_agent: Option<String>,

    /// Deadline for the whole fetch, in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum body size in bytes
    #[arg(long)]
    max_body_size: Option<usize>,

    /// Verify TLS certificates
    #[arg(long)]
    verify_certs: bool,

    /// Log level
    #[arg(long, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, default_value_t = LogFormat::Plain)]
    log_format: LogFormat,
}

fn build_client(args: &Args) -> Result<HttpClient> {
    let config = TransportConfig {
        accept_invalid_certs: !args.verify_certs,
        ..Default::default()
    };

    let client = match (&args.proxy, &args.socks5) {
        (Some(proxy), _) => build_http_proxy(proxy, &config)?,
        (None, Some(address)) => {
            let credentials = args
                .user
                .as_ref()
                .map(|user| Credentials::new(user, &args.password));
            build_socks5_proxy(address, credentials.as_ref(), &config)?
        }
        (None, None) => build_direct(&config)?,
    };
    Ok(client)
}

fn build_request(args: &Args) -> Result<Request> {
    let mut request = Request::new(&args.url, args.method);
    if let Some(user_agent) = &args.user_agent {
        request = request.user_agent(user_agent);
    }
    for header in &args.headers {
        let Some((name, value)) = header.split_once(':') else {
            bail!("header {header:?} is not of the form `Name: value`");
        };
        request = request.header(name.trim(), value.trim());
    }
    for field in &args.form {
        let Some((name, value)) = field.split_once('=') else {
            bail!("form field {field:?} is not of the form `name=value`");
        };
        request = request.form(name, value);
    }
    if let Some(secs) = args.timeout {
        request = request.timeout(Duration::from_secs(secs));
    }
    Ok(request)
}

async fn run(args: Args) -> Result<()> {
    let client = build_client(&args).context("Failed to build HTTP client")?;
    let request = build_request(&args)?;
    let config = FetchConfig {
        max_body_size: args.max_body_size,
        ..Default::default()
    };

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let response = match fetch_with_config(&request, &client, &config, &cancel).await {
        Ok(response) => response,
        Err(FetchError::Decode { charset, response }) => {
            eprintln!("warning: body had malformed {charset} sequences");
            *response
        }
        Err(e) => return Err(e.into()),
    };

    println!("URL:      {}", response.url);
    println!("Status:   {}", response.code);
    println!("MIME:     {}", response.mime_type);
    println!("Type:     {}", response.file_suffix());
    println!("Charset:  {}", response.charset);
    println!("Cookies:  {}", response.cookies);
    println!(
        "Timing:   response {:?}, download {:?}, total {:?}",
        response.timing.response_time, response.timing.download_time, response.timing.total_time
    );
    println!();
    if response.is_text() {
        println!("{}", response.text);
    } else {
        println!("<{} bytes of binary content>", response.body.len());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logger_with(args.log_level.into(), args.log_format)
        .context("Failed to initialize logger")?;

    if let Err(e) = run(args).await {
        eprintln!("fetch error: {e:#}");
        process::exit(1);
    }
    Ok(())
}
