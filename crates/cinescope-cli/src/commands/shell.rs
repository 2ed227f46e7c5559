use super::progress::{is_interactive, pending};
use super::{browse, prompts, render};
use crate::output::Output;
use cinescope_config::Config;
use cinescope_core::{AppContext, GuardDecision, Route, SyncError};
use cinescope_models::{AddSource, MovieId};
use color_eyre::Result;
use owo_colors::OwoColorize;
use tracing::debug;

const HELP: &[(&str, &str)] = &[
    ("go <path>", "Navigate (/trending, /watchlist, /suggested, /login, /register)"),
    ("trending | watchlist | suggested", "Shortcuts for go"),
    ("login", "Sign in"),
    ("register", "Create an account"),
    ("logout", "Sign out"),
    ("reload", "Reload the current page"),
    ("search <text>", "Watchlist: search the catalog"),
    ("add <id>", "Watchlist: save a search result. Suggested: save a suggestion"),
    ("add-title <title>", "Watchlist: save a movie by title"),
    ("remove <id>", "Watchlist: remove a saved movie"),
    ("help", "Show this help"),
    ("quit", "Exit"),
];

struct Shell<'a> {
    app: &'a AppContext,
    output: &'a Output,
    image_base_url: &'a str,
    current: Route,
}

pub async fn run_shell(app: &AppContext, config: &Config, start: &str, output: &Output) -> Result<()> {
    let mut shell = Shell {
        app,
        output,
        image_base_url: &config.display.image_base_url,
        current: Route::Login,
    };

    // The boot check runs alongside the first navigation so its placeholder is what shows
    let (_, route) = pending("Checking session...", async { tokio::join!(app.boot(), app.open(start)) }).await;
    shell.show(route);

    loop {
        let line = prompts::prompt_string(&format!("cinescope {}", shell.current.path()), None)?;
        let line = line.trim();
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, argument.trim()),
            None => (line, ""),
        };

        match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => shell.help(),
            "go" | "open" => shell.go(if argument.is_empty() { "/" } else { argument }).await,
            "trending" => shell.go(Route::Trending.path()).await,
            "watchlist" => shell.go(Route::Watchlist.path()).await,
            "suggested" => shell.go(Route::Suggestions.path()).await,
            "login" => shell.login().await?,
            "register" => shell.register().await?,
            "logout" => shell.logout().await,
            "reload" => shell.reload().await,
            "search" => shell.search(argument).await,
            "add" => shell.add(argument).await?,
            "add-title" => shell.add_title(argument).await?,
            "remove" => shell.remove(argument).await?,
            other => output.warn(format!("Unknown command '{}'. Type 'help' for the list.", other)),
        }
    }

    Ok(())
}

impl Shell<'_> {
    fn show(&mut self, route: Route) {
        self.current = route;
        render::navigation(self.output, route, self.app.session().status());
        render::page(self.output, self.app, route, self.image_base_url);
    }

    fn help(&self) {
        if self.output.is_json() {
            return;
        }
        for (usage, description) in HELP {
            println!("  {:<34} {}", usage.bold(), description);
        }
    }

    async fn go(&mut self, path: &str) {
        let route = match self.app.guard().decide(path) {
            GuardDecision::Pending => pending("Checking session...", self.app.open(path)).await,
            _ => pending("Loading...", self.app.open(path)).await,
        };
        debug!(path = %path, route = route.name(), "Navigated");
        self.show(route);
    }

    async fn reload(&mut self) {
        // Failures land in the list's error slot and render with the page
        let _ = pending("Loading...", self.app.reload(self.current)).await;
        self.show(self.current);
    }

    async fn login(&mut self) -> Result<()> {
        if self.app.session().status().is_authenticated() {
            self.output.info("Already signed in.");
            return Ok(());
        }
        let email = prompts::prompt_string("Email", None)?;
        let password = prompts::prompt_password("Password")?;
        match pending("Signing in...", self.app.login_form().submit(&email, &password)).await {
            Ok(next) => {
                self.output.success("Signed in");
                self.go(next.path()).await;
            }
            Err(e) => self.output.error(e.to_string()),
        }
        Ok(())
    }

    async fn register(&mut self) -> Result<()> {
        if browse::register(self.app, None, self.output).await? {
            self.go(Route::Login.path()).await;
        }
        Ok(())
    }

    async fn logout(&mut self) {
        if !self.app.session().status().is_authenticated() {
            self.output.warn("Not signed in.");
            return;
        }
        match pending("Signing out...", self.app.logout()).await {
            Ok(()) => {
                self.output.success("Signed out");
                self.go(self.current.path()).await;
            }
            Err(e) => self.output.error(e.to_string()),
        }
    }

    async fn search(&mut self, text: &str) {
        if self.current != Route::Watchlist {
            self.output.warn("Search is available on the watchlist page.");
            return;
        }
        let search = self.app.watchlist().search();
        search.input(text);
        pending("Searching...", search.settled()).await;
        render::candidates(self.output, &search.query(), &search.results(), self.image_base_url);
    }

    async fn add(&mut self, argument: &str) -> Result<()> {
        let Some(movie_id) = self.movie_id(argument) else {
            return Ok(());
        };
        let result = match self.current {
            Route::Suggestions => {
                pending("Adding...", self.app.suggestions().add_item(movie_id, AddSource::Suggested)).await
            }
            Route::Watchlist => pending("Adding...", self.app.watchlist().add_from_search(movie_id)).await,
            _ => {
                self.output.warn("Adding is available on the watchlist and suggested pages.");
                return Ok(());
            }
        };
        self.settle(result, "Added to watchlist")
    }

    async fn add_title(&mut self, title: &str) -> Result<()> {
        if self.current != Route::Watchlist {
            self.output.warn("Adding by title is available on the watchlist page.");
            return Ok(());
        }
        match pending("Adding...", self.app.watchlist().add_by_title(title)).await {
            Ok(false) => {
                self.output.warn("Enter a movie title.");
                Ok(())
            }
            Ok(true) => self.settle(Ok(()), "Added to watchlist"),
            Err(e) => self.settle(Err(e), ""),
        }
    }

    async fn remove(&mut self, argument: &str) -> Result<()> {
        if self.current != Route::Watchlist {
            self.output.warn("Removing is available on the watchlist page.");
            return Ok(());
        }
        let Some(movie_id) = self.movie_id(argument) else {
            return Ok(());
        };
        let result = pending("Removing...", self.app.watchlist().remove(movie_id)).await;
        self.settle(result, "Removed from watchlist")
    }

    fn movie_id(&self, argument: &str) -> Option<MovieId> {
        match argument.parse::<MovieId>() {
            Ok(movie_id) => Some(movie_id),
            Err(e) => {
                self.output.warn(format!("{}. Usage: add <id> | remove <id>", e));
                None
            }
        }
    }

    /// Report an add or remove, then redraw the page
    fn settle(&mut self, result: std::result::Result<(), SyncError>, success: &str) -> Result<()> {
        match result {
            Ok(()) => self.output.success(success),
            // Refused locally: nothing reached the service
            Err(e) if e.kind().is_none() => self.output.warn(e.to_string()),
            Err(e) => {
                self.output.notice(e.to_string());
                if is_interactive() && !self.output.is_json() {
                    prompts::prompt_string("Press Enter to continue", Some(""))?;
                }
            }
        }
        self.show(self.current);
        Ok(())
    }
}
