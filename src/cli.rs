use chrono::{TimeDelta, Utc};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;

use diamondproxy::auth::TokenCache;
use diamondproxy::config::Config;
use diamondproxy::rapnet::{ClientCredentials, RapnetClient, RapnetError};
use diamondproxy::search::{FinishPreset, PageWindow, SearchFilters, SearchPage};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Parser, Debug)]
#[command(name = "diamondproxy")]
#[command(about = "RapNet diamond search proxy", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Server(ServerArgs),
    /// Fetch an access token with the configured credentials
    Token,
    /// Run one inventory search and print a page summary
    Search(SearchArgs),
}

#[derive(clap::Args, Debug)]
pub struct ServerArgs {
    /// Address to bind, overriding `server.bind_addr` and `PORT`
    #[arg(long)]
    pub address: Option<SocketAddr>,
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Shapes, comma separated (default: all)
    #[arg(long = "shape", value_delimiter = ',')]
    pub shapes: Vec<String>,
    #[arg(long = "lab", value_delimiter = ',')]
    pub labs: Vec<String>,
    /// Colour grades; collapsed to the span they cover
    #[arg(long = "color", value_delimiter = ',')]
    pub colors: Vec<String>,
    #[arg(long = "clarity", value_delimiter = ',')]
    pub clarities: Vec<String>,
    #[arg(long)]
    pub size_from: Option<String>,
    #[arg(long)]
    pub size_to: Option<String>,
    #[arg(long)]
    pub price_from: Option<String>,
    #[arg(long)]
    pub price_to: Option<String>,
    /// 3X, EX-, VG+ or VG-
    #[arg(long)]
    pub finish: Option<FinishPreset>,
    #[arg(long)]
    pub sort_by: Option<String>,
    #[arg(long)]
    pub sort_direction: Option<String>,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long)]
    pub page_size: Option<u32>,
    /// Print the raw upstream response instead of a summary
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    fn filters(&self) -> SearchFilters {
        SearchFilters::builder()
            .shapes(self.shapes.clone())
            .labs(self.labs.clone())
            .colors(self.colors.clone())
            .clarities(self.clarities.clone())
            .maybe_size_from(self.size_from.clone())
            .maybe_size_to(self.size_to.clone())
            .maybe_price_from(self.price_from.clone())
            .maybe_price_to(self.price_to.clone())
            .maybe_finish(self.finish)
            .maybe_sort_by(self.sort_by.clone())
            .maybe_sort_direction(self.sort_direction.clone())
            .page_number(self.page)
            .maybe_page_size(self.page_size)
            .build()
    }
}

pub async fn token() -> Result<(), AnyError> {
    let config = Config::load()?;
    let credentials =
        ClientCredentials::from_config(&config.rapnet).ok_or(RapnetError::MissingCredentials)?;
    let client = RapnetClient::new(&config.rapnet)?;

    let issued = client.fetch_token(&credentials).await?;
    let expires_at = TimeDelta::try_seconds(issued.expires_in)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime));

    match expires_at {
        Some(at) => println!("Token obtained, expires in {}s ({})", issued.expires_in, at.to_rfc3339()),
        None => println!("Token obtained, expires in {}s", issued.expires_in),
    }
    Ok(())
}

pub async fn search(args: SearchArgs) -> Result<(), AnyError> {
    let config = Config::load()?;
    let client = Arc::new(RapnetClient::new(&config.rapnet)?);
    let tokens = TokenCache::new(
        client.clone(),
        ClientCredentials::from_config(&config.rapnet),
        config.rapnet.refresh_skew.as_duration(),
    );

    let filters = args.filters();
    let token = tokens.get_token().await?;
    let response = client.search(&token, &filters.to_value()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response.body)?);
        return Ok(());
    }

    let page = SearchPage::from_body(&response.body);
    let window = PageWindow::new(
        u64::from(filters.page()),
        u64::from(filters.effective_page_size()),
        page.total,
    );

    println!("{window}");
    for diamond in &page.diamonds {
        println!(
            "  {:<12} {}  {}",
            diamond.sku().unwrap_or_default(),
            diamond.display_name(),
            diamond.price()
        );
    }

    let items = window.items();
    if !items.is_empty() {
        let bar = items.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ");
        println!("Pages: {bar}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_args_build_filters() {
        let cli = Cli::parse_from([
            "diamondproxy",
            "search",
            "--shape",
            "Round,Oval",
            "--color",
            "G,D",
            "--finish",
            "3X",
            "--page",
            "2",
        ]);

        let Commands::Search(args) = cli.command else {
            panic!("expected search command");
        };
        let request = args.filters().to_request();

        assert_eq!(request.shapes, vec!["Round", "Oval"]);
        assert_eq!((request.color_from.as_str(), request.color_to.as_str()), ("D", "G"));
        assert_eq!(request.cut_from, "Excellent");
        assert_eq!(request.page_number, "2");
        assert_eq!(request.page_size, "20");
    }

    #[test]
    fn test_server_address_is_optional() {
        let cli = Cli::parse_from(["diamondproxy", "server"]);
        assert!(matches!(cli.command, Commands::Server(ServerArgs { address: None })));
    }
}
