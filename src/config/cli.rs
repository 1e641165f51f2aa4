use crate::config::client_config::{ClientConfig, SessionConfig};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "broken-client")]
#[command(about = "Command-line client for the shop REST API")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "API base URL (overrides the configuration file)")]
    pub base_url: Option<String>,

    #[arg(long, help = "Session token sent as the authorization header")]
    pub token: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LoginMode {
    Html,
    Json,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List testimonials
    Testimonials,
    /// Count testimonials
    TestimonialsCount,
    /// List products (authorized)
    Products,
    /// List the latest products
    LatestProducts,
    /// Submit a testimonial (authorized)
    PostTestimonial {
        #[arg(long)]
        name: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        message: String,
        #[arg(long)]
        rating: Option<u8>,
    },
    /// Subscribe an email address
    Subscribe { email: String },
    /// Register a user
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        ldap_profile_link: Option<String>,
    },
    /// Log in
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, value_enum, default_value = "json")]
        mode: LoginMode,
    },
    /// Fetch an LDAP profile
    Ldap { link: String },
    /// Fetch a fingerprint-bound XSRF token
    DomToken { fingerprint: String },
    /// Fetch a simple XSRF token
    SimpleToken,
    /// Fetch the OIDC client descriptor
    OidcClient,
    /// Trigger the metadata callout
    Metadata,
    /// Download a user photo (authorized)
    GetPhoto {
        email: String,
        #[arg(long, short)]
        output: String,
    },
    /// Upload a user photo (authorized)
    PutPhoto { email: String, file: String },
    /// Call the redirect proxy
    Goto { url: String },
    /// Submit a render payload
    Render { data: String },
}

impl CliConfig {
    /// 合併設定檔與命令列參數，命令列優先
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => {
                let base_url = validation::validate_required_field("base_url", &self.base_url)?;
                ClientConfig::new(base_url.clone())
            }
        };

        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }

        if let Some(token) = &self.token {
            config.session = Some(SessionConfig {
                token: Some(token.clone()),
            });
        }

        config.validate()?;
        Ok(config)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config {
            validation::validate_path("config", path)?;
        }
        if let Some(base_url) = &self.base_url {
            validation::validate_url("base_url", base_url)?;
        }
        match &self.command {
            Command::GetPhoto { output, .. } => validation::validate_path("output", output)?,
            Command::PutPhoto { file, .. } => validation::validate_path("file", file)?,
            _ => {}
        }
        Ok(())
    }
}
