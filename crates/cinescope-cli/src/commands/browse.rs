use super::progress::pending;
use super::{prompts, render};
use crate::output::Output;
use cinescope_config::Config;
use cinescope_core::{AppContext, ListView, Route, REGISTERED_NOTICE};
use color_eyre::Result;
use tracing::info;

/// Sign-in details for one-shot commands; anything missing is prompted for
#[derive(clap::Args, Debug, Clone)]
pub struct Credentials {
    /// Account email
    #[arg(long, env = "CINESCOPE_EMAIL")]
    pub email: Option<String>,

    /// Account password (prompted without echo when absent)
    #[arg(long, env = "CINESCOPE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Verify the session, signing in with `credentials` if it is not valid
pub async fn ensure_signed_in(app: &AppContext, credentials: Credentials, output: &Output) -> Result<()> {
    let status = pending("Checking session...", app.boot()).await;
    if status.is_authenticated() {
        return Ok(());
    }

    output.info("Not signed in.");
    let email = prompts::string_or_prompt(credentials.email, "Email")?;
    let password = prompts::password_or_prompt(credentials.password, "Password")?;
    pending("Signing in...", app.login_form().submit(&email, &password))
        .await
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    Ok(())
}

/// Print one page and exit. A list that failed to load makes the command fail.
pub async fn run_page(
    app: &AppContext,
    route: Route,
    credentials: Credentials,
    config: &Config,
    output: &Output,
) -> Result<()> {
    ensure_signed_in(app, credentials, output).await?;

    let admitted = pending("Loading...", app.open(route.path())).await;
    info!(operation = "open", route = admitted.name(), "Page loaded");
    render::page(output, app, admitted, &config.display.image_base_url);

    let failure = match admitted {
        Route::Trending => failed(&app.trending().view()),
        Route::Watchlist => failed(&app.watchlist().view()),
        Route::Suggestions => failed(&app.suggestions().view()),
        Route::Login | Route::Register => None,
    };
    match failure {
        Some(message) => Err(color_eyre::eyre::eyre!(message)),
        None => Ok(()),
    }
}

fn failed<T>(view: &ListView<T>) -> Option<String> {
    match view {
        ListView::Failed(message) => Some(message.clone()),
        _ => None,
    }
}

/// Prompt for the registration form and submit it
pub async fn register(app: &AppContext, email: Option<String>, output: &Output) -> Result<bool> {
    let email = prompts::string_or_prompt(email, "Email")?;
    let password = prompts::prompt_password("Password")?;
    let confirmation = prompts::prompt_password("Confirm password")?;

    match pending("Creating account...", app.register_form().submit(&email, &password, &confirmation)).await {
        Ok(_) => {
            output.success(REGISTERED_NOTICE);
            Ok(true)
        }
        Err(e) => {
            output.error(e.to_string());
            Ok(false)
        }
    }
}

pub async fn run_register(app: &AppContext, email: Option<String>, output: &Output) -> Result<()> {
    if register(app, email, output).await? {
        Ok(())
    } else {
        Err(color_eyre::eyre::eyre!("Registration failed"))
    }
}
