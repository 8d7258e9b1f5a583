use std::{
    process::ExitCode,
    sync::Arc,
};

use taberu::{
    app::terminal,
    core::{
        http::http_client,
        tasks::TaskManager,
    },
    directory::HttpDirectoryClient,
    location::FixedLocation,
    reviews::HttpReviewsClient,
    telemetry::init_tracing,
    Session,
    Settings,
    TaberuError,
};
use tracing::{
    error,
    info,
};

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(TaberuError::LocationUnavailable(message)) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "taberu exited with an error");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), TaberuError> {
    let settings = Settings::load();
    let api_key = settings.reviews_api_key.clone().ok_or(TaberuError::MissingApiKey)?;

    let client = http_client()?;
    let directory = HttpDirectoryClient::new(client.clone(), settings.directory_url.clone());
    let reviews = HttpReviewsClient::new(
        client,
        settings.reviews_url.clone(),
        api_key,
        settings.search_options(),
    );
    let tasks = TaskManager::new(Arc::new(directory), Arc::new(reviews))?;

    let locator = FixedLocation(settings.location);
    let mut session = Session::start(settings, &locator, tasks)?;
    info!(location = %session.location().as_query(), "Session started");

    terminal::run(&mut session)?;

    info!(liked = session.suggestions().len(), "Session ended");
    Ok(())
}
