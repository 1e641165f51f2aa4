use broken_client::config::cli::LoginMode;
use broken_client::core::{LoginFormMode, LoginUser, PhotoFile, RegistrationUser, Testimonial};
use broken_client::utils::error::ErrorCategory;
use broken_client::utils::{logger, validation::Validate};
use broken_client::{
    ApiClient, ClientError, CliConfig, Command, ReqwestTransport, SessionStorage, SessionToken,
};
use clap::Parser;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    if let Err(e) = cli.validate() {
        tracing::error!("❌ Invalid arguments: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let config = match cli.client_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let storage = SessionStorage::new();
    if let Some(token) = config.token() {
        storage.set_item(broken_client::adapters::session::TOKEN_KEY, token);
    }

    let client = ApiClient::new(
        ReqwestTransport::new(),
        SessionToken::new(storage),
        config.urls(),
    );
    tracing::debug!("Using API at {}", client.urls().base_url());

    match run(&client, cli.command).await {
        Ok(Some(output)) => println!("{}", output),
        Ok(None) => {}
        Err(e) => {
            tracing::error!("❌ Request failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = match e.category() {
                ErrorCategory::Configuration => 1,
                ErrorCategory::Transport => 2,
                ErrorCategory::Http => 3,
                ErrorCategory::Decode => 4,
                ErrorCategory::Io => 5,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(
    client: &ApiClient<ReqwestTransport, SessionToken>,
    command: Command,
) -> Result<Option<String>, ClientError> {
    let value = match command {
        Command::Testimonials => client.get_testimonials().await?,
        Command::TestimonialsCount => client.get_testimonials_count().await?,
        Command::Products => serde_json::to_value(client.get_products().await?)?,
        Command::LatestProducts => serde_json::to_value(client.get_latest_products().await?)?,
        Command::PostTestimonial {
            name,
            title,
            message,
            rating,
        } => {
            let testimonial = Testimonial {
                name,
                title,
                message,
                rating,
            };
            client.post_testimonial(&testimonial).await?
        }
        Command::Subscribe { email } => client.post_subscription(&email).await?,
        Command::Register {
            email,
            password,
            first_name,
            last_name,
            ldap_profile_link,
        } => {
            let user = RegistrationUser {
                email,
                password,
                first_name,
                last_name,
                ldap_profile_link,
            };
            client.post_user(&user).await?
        }
        Command::Login {
            email,
            password,
            mode,
        } => {
            let op = match mode {
                LoginMode::Html => LoginFormMode::Html,
                LoginMode::Json => LoginFormMode::Json,
            };
            client.login(&LoginUser { email, password, op }).await?
        }
        Command::Ldap { link } => client.get_ldap(&link).await?,
        Command::DomToken { fingerprint } => {
            return Ok(Some(client.load_dom_xsrf_token(&fingerprint).await?));
        }
        Command::SimpleToken => return Ok(Some(client.load_xsrf_token().await?)),
        Command::OidcClient => serde_json::to_value(client.get_oidc_client().await?)?,
        Command::Metadata => client.post_metadata().await?,
        Command::GetPhoto { email, output } => {
            let photo = client.get_user_photo(&email).await?;
            std::fs::write(&output, &photo)?;
            tracing::info!("📁 Saved {} bytes to {}", photo.len(), output);
            return Ok(None);
        }
        Command::PutPhoto { email, file } => {
            let content = std::fs::read(&file)?;
            let file_name = Path::new(&file)
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("photo.png")
                .to_string();
            client
                .put_photo(PhotoFile::new(file_name, content), &email)
                .await?
        }
        Command::Goto { url } => client.go_to(&url).await?,
        Command::Render { data } => client.post_render(&data).await?,
    };

    Ok(Some(serde_json::to_string_pretty(&value)?))
}
