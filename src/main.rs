//! `api-route` command line tool.
//!
//! Loads a routes file and tries its routes in file order, the way a host
//! router would iterate candidates.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use api_route::config::{build_routes, load_config};
use api_route::observability::logging::init_logging;
use api_route::routing::request::parse_query;
use api_route::{ApiRoute, Parameters, RequestParts};

#[derive(Parser)]
#[command(name = "api-route")]
#[command(about = "Check, match and build API routes from a routes file", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the routes file and print compiled expressions
    Check,
    /// Match a request against the routes and print the invocation
    Match {
        /// Request path, optionally with a query string
        path: String,
        #[arg(short, long, default_value = "GET")]
        method: String,
        /// Extra header as "Name: value"
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
        #[arg(short, long)]
        accept: Option<String>,
    },
    /// Build a URL for an action
    Build {
        action: String,
        #[arg(short, long)]
        presenter: Option<String>,
        /// Parameter as "name=value"
        #[arg(short = 'P', long = "param")]
        params: Vec<String>,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    init_logging(&config.observability)?;
    let routes = build_routes(&config)?;

    tracing::debug!(routes = routes.len(), "Routes compiled");

    match cli.command {
        Commands::Check => {
            for route in &routes {
                print_route(route);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Match {
            path,
            method,
            headers,
            accept,
        } => {
            let request = build_request(&path, &method, &headers, accept.as_deref())?;
            match routes.iter().find_map(|route| route.match_request(&request)) {
                Some(invocation) => {
                    println!("{}", serde_json::to_string_pretty(&invocation)?);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("No route matched {} {}", method, path);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Build {
            action,
            presenter,
            params,
        } => {
            let parameters = parse_params(&params)?;
            let url = routes.iter().find_map(|route| {
                route.build_url(presenter.as_deref(), &action, &parameters, &config.base_url)
            });
            match url {
                Some(url) => {
                    println!("{}", url);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("No route can build action '{}'", action);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

fn print_route(route: &ApiRoute) {
    let methods: Vec<&str> = route.methods().into_iter().map(|m| m.as_str()).collect();
    println!("{}", route.path());
    println!("  handler:    {}", route.handler().unwrap_or("-"));
    println!("  methods:    {}", methods.join(", "));
    println!("  expression: {}", route.compiled().expression());
    println!("  captures:   {:?}", route.compiled().capture_order());
    println!("  required:   {:?}", route.required_parameters());
    if !route.is_enabled() {
        println!("  (disabled)");
    }
}

fn build_request(
    target: &str,
    method: &str,
    headers: &[String],
    accept: Option<&str>,
) -> Result<RequestParts, String> {
    let (path, query) = target.split_once('?').unwrap_or((target, ""));

    let mut request = RequestParts::new(method, path);
    request.query = parse_query(query);

    for header in headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| format!("invalid header '{}', expected 'Name: value'", header))?;
        request = request.with_header(name.trim(), value.trim());
    }
    if let Some(accept) = accept {
        request = request.with_header("Accept", accept);
    }
    Ok(request)
}

fn parse_params(params: &[String]) -> Result<Parameters, String> {
    params
        .iter()
        .map(|param| {
            param
                .split_once('=')
                .map(|(name, value)| (name.to_string(), Some(value.to_string())))
                .ok_or_else(|| format!("invalid parameter '{}', expected 'name=value'", param))
        })
        .collect()
}
