use std::{process, sync::Arc};

use folio::{
    application::{
        error::AppError, pages::BlogPages, posts::PostStore, repos::ContentSource,
        summary::SummaryIndex,
    },
    config::{self, Command},
    infra::{http::HttpContentSource, telemetry},
    presentation::{print::print_view, views::RenderedView},
};
use tracing::{Dispatch, Level, debug, dispatcher, error};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, kind = ?error.kind(), "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, kind = ?error.kind(), "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;
    debug!(
        summary_url = %settings.api.summary_url,
        posts_url = %settings.api.posts_url,
        "configuration loaded"
    );

    let source: Arc<dyn ContentSource> = Arc::new(HttpContentSource::new(&settings.api)?);
    let pages = BlogPages::new(
        Arc::new(PostStore::new(Arc::clone(&source))),
        Arc::new(SummaryIndex::new(source)),
        settings.site,
    );

    let view = match cli_args.command {
        Command::Summary(args) => {
            RenderedView::Summary(pages.summary(args.limit, args.snippets).await?)
        }
        Command::Post { id } => RenderedView::Post(pages.post(&id).await?),
        Command::Category { name } => RenderedView::Category(pages.category(&name).await?),
        Command::Categories => RenderedView::Categories(pages.categories().await?),
        Command::About => RenderedView::About(pages.about()),
        Command::Route { path } => pages.route(&path).await?,
    };

    print_view(&view, cli_args.json)
}
