use acctctrl::platform::Builder;
use clap::Parser;
use http::{
    header::{
        InvalidHeaderValue,
        ACCEPT,
        CONTENT_TYPE,
    },
    HeaderValue,
    Method,
};
use tower_http::cors::{
    AllowOrigin,
    CorsLayer,
};

#[derive(Debug, Parser)]
pub struct Cli {
    #[clap(long, value_name = "CORS_ALLOW_ORIGIN", env = "CORS_ALLOW_ORIGIN", value_delimiter = ';')]
    pub cors_allow_origins: Vec<String>,
    #[clap(
        long,
        value_name = "ACCT_LISTEN",
        env = "ACCT_LISTEN",
        default_value = "127.0.0.1:9380",
    )]
    pub acct_listen: String,
    #[clap(flatten)]
    pub platform_builder: Builder,
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Only the listed origins are allowed; none when the list is empty.
    pub fn cors_layer(&self) -> Result<CorsLayer, InvalidHeaderValue> {
        let origins = self.cors_allow_origins.iter()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .map(HeaderValue::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([ACCEPT, CONTENT_TYPE])
        )
    }
}

#[cfg(test)]
mod test {
    use clap::Parser;
    use super::Cli;

    #[test]
    fn parse_origins() {
        let cli = Cli::try_parse_from([
            "acctapp",
            "--acct-db-url", "sqlite::memory:",
            "--cors-allow-origins", "https://admin.example.com;http://localhost:3000",
        ]).expect("valid arguments");
        assert_eq!(cli.cors_allow_origins, [
            "https://admin.example.com",
            "http://localhost:3000",
        ]);
        assert!(cli.cors_layer().is_ok());

        let cli = Cli::try_parse_from([
            "acctapp",
            "--acct-db-url", "sqlite::memory:",
            "--cors-allow-origins", "bad\norigin",
        ]).expect("valid arguments");
        assert!(cli.cors_layer().is_err());
    }
}
