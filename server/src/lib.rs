pub mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct Config {
        /// Connection string for the relational backend. With no usable
        /// value the service falls back to in-memory storage.
        #[serde(default)]
        pub database_url: Option<String>,
        #[serde(default = "default_port")]
        pub port: u16,
        /// Comma-separated list of origins allowed to call the API across
        /// origins. Absent means no cross-origin access.
        #[serde(default)]
        pub cors_origins: Option<String>,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(config::Environment::default())
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }
    }

    fn default_port() -> u16 {
        8080
    }
}
pub mod entities;
pub mod storage;
pub mod todo;
pub mod web;
