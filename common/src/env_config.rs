use std::{env, sync::Arc};

#[derive(Clone, Debug)]
/// Configuration struct for the server.
///
/// Holds everything needed to initialize and run the service: database
/// connection details, identity-token verification secret, server host and
/// port, CORS settings, logging preferences, the public URLs used to build
/// gateway redirect/notification links, and the Mercado Pago credential.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// The URL of the database to connect to.
    pub database_url: String,
    /// The hostname or IP address the server will bind to.
    pub server_host: String,
    /// The port number the server will listen on.
    pub server_port: u16,
    /// The number of worker threads to spawn for handling requests.
    pub num_workers: usize,
    /// The allowed origin for CORS (Cross-Origin Resource Sharing).
    pub cors_allowed_origin: String,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// Base URL of the web application, used for the gateway back urls.
    pub web_app_url: String,
    /// Public base URL of this API, used for the webhook notification url.
    pub public_base_url: String,
    /// Secret the identity provider signs access tokens with (HS256).
    pub identity_jwt_secret: String,
    /// Mercado Pago configuration.
    pub mercado_pago: MercadoPagoConfig,
    /// Subscription period granted per approved payment when the payment
    /// carries no billing cadence metadata.
    pub subscription_period_days: i64,
}

#[derive(Clone, Debug)]
/// Credentials and endpoints for the Mercado Pago gateway.
///
/// The access token is optional at startup: endpoints that need it fail per
/// request with a configuration error instead of refusing to boot, so the
/// rest of the API stays usable while payments are unconfigured.
pub struct MercadoPagoConfig {
    /// The access token for the Mercado Pago API. Empty when unconfigured.
    pub access_token: String,
    /// Base URL of the Mercado Pago API.
    pub api_url: String,
    /// Currency used for checkout line items.
    pub billing_currency: String,
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `ENVIRONMENT`: "development" or "production"
    /// - `DATABASE_URL`: Connection string for the database
    /// - `IDENTITY_JWT_SECRET`: Secret used to verify identity tokens
    ///
    /// Optional (with defaults):
    /// - `IP`: Server host (default: "127.0.0.1")
    /// - `PORT`: Server port (default: 8080)
    /// - `WORKERS`: Number of worker threads (default: 4)
    /// - `CORS_ALLOWED_ORIGIN`: Allowed CORS origin, "*" for any (default: "*")
    /// - `ENABLE_CONSOLE_LOGGING`: Whether to enable console logging (default: true)
    /// - `WEB_APP_URL`: Web application base URL (default: "http://localhost:3000")
    /// - `PUBLIC_BASE_URL`: Public base URL of this API (default: "http://localhost:8080")
    /// - `MERCADO_PAGO_ACCESS_TOKEN`: Gateway credential (default: empty)
    /// - `MERCADO_PAGO_API_URL`: Gateway base URL (default: "https://api.mercadopago.com")
    /// - `BILLING_CURRENCY`: Checkout currency (default: "BRL")
    /// - `SUBSCRIPTION_PERIOD_DAYS`: Fallback period length (default: 30)
    ///
    /// # Panics
    ///
    /// Panics if required environment variables are missing or if numeric
    /// values cannot be parsed correctly.
    pub fn from_env() -> Arc<Self> {
        dotenvy::dotenv().ok();

        Arc::new(Config {
            environment: env::var("ENVIRONMENT").expect("ENVIRONMENT must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_host: env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            num_workers: env::var("WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .unwrap_or(4),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "*".to_string()),
            console_logging_enabled: env::var("ENABLE_CONSOLE_LOGGING")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                == "true",
            web_app_url: env::var("WEB_APP_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            identity_jwt_secret: env::var("IDENTITY_JWT_SECRET")
                .expect("IDENTITY_JWT_SECRET must be set"),
            mercado_pago: MercadoPagoConfig {
                access_token: env::var("MERCADO_PAGO_ACCESS_TOKEN").unwrap_or_default(),
                api_url: env::var("MERCADO_PAGO_API_URL")
                    .unwrap_or_else(|_| "https://api.mercadopago.com".to_string()),
                billing_currency: env::var("BILLING_CURRENCY")
                    .unwrap_or_else(|_| "BRL".to_string()),
            },
            subscription_period_days: env::var("SUBSCRIPTION_PERIOD_DAYS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("SUBSCRIPTION_PERIOD_DAYS must be a valid number"),
        })
    }
}
