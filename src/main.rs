use clap::{Parser, Subcommand};
use serde_json::to_string_pretty;
use websearch_api::{config, logger, server, Searcher};

#[derive(Parser)]
#[clap(name = "websearch-api")]
#[clap(about = "A search engine scraping API", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server API
    Serve {
        /// Port to run the server on (overrides the PORT env var)
        #[clap(short, long, value_parser)]
        port: Option<u16>,
    },

    /// Run a one-shot search and print the results
    Search {
        /// The query to search for
        #[clap(value_parser)]
        query: String,

        /// Output format (json or text)
        #[clap(short, long, value_parser, default_value = "text")]
        format: String,

        /// Maximum number of results
        #[clap(short, long, value_parser)]
        count: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init_logger();

    let cli = Cli::parse();
    let config = config::get_config();

    match &cli.command {
        Commands::Serve { port } => {
            server::serve(port.unwrap_or_else(|| config.port())).await?;
        }

        Commands::Search {
            query,
            format,
            count,
        } => {
            let searcher = Searcher::with_defaults()?;
            let max_results = count.unwrap_or_else(|| config.max_results());

            match searcher.search(query, max_results).await {
                Ok(response) => match format.as_str() {
                    "json" => {
                        println!("{}", to_string_pretty(&response)?);
                    }
                    _ => {
                        println!(
                            "{} results for {:?} ({})",
                            response.results_count, response.query, response.timestamp
                        );
                        for result in &response.results {
                            println!("{}. {}", result.position, result.title);
                            println!("   {}", result.url);
                            if !result.description.is_empty() {
                                println!("   {}", result.description);
                            }
                        }
                        if let Some(message) = &response.message {
                            println!("{}", message);
                        }
                    }
                },
                Err(e) => {
                    log::error!("Search failed: {}", e);
                    eprintln!("Search failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
