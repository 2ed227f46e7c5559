use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::io::IsTerminal;
use std::time::Duration;

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Drive `future` to completion behind a neutral spinner.
///
/// Without a terminal the spinner is replaced by a single structured log line.
pub async fn pending<F: Future>(message: &str, future: F) -> F::Output {
    if !is_interactive() {
        tracing::debug!(operation = "progress", message = %message, "Waiting");
        return future.await;
    }

    let spinner = spinner(message);
    let output = future.await;
    spinner.finish_and_clear();
    output
}
