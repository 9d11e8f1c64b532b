use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ats_comments::api::{self, AtsClient};
use ats_comments::config::{Config, SectionKind, ViewerTarget};
use ats_comments::{RecordSource, Section, Tab};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;
    let target = ViewerTarget::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("ats_comments={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "Starting ATS comments viewer v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.api_url
    );

    let client = AtsClient::from_config(&config)?;

    match target.kind {
        SectionKind::CandidateComments => {
            let source = api::candidate_comments(client, target.subject_id, target.stage_id);
            print_section("Candidate comments", source).await;
        }
        SectionKind::PositionComments => {
            let source = api::position_comments(client, target.subject_id, target.stage_id);
            print_section("Position comments", source).await;
        }
        SectionKind::CandidateReviews => {
            let source = api::candidate_reviews(client, target.subject_id, target.stage_id);
            print_section("Candidate reviews", source).await;
        }
    }

    Ok(())
}

/// Loads a read-only section and prints every tab.
async fn print_section<S: RecordSource>(title: &str, source: S) {
    let mut section = Section::new(Arc::new(source)).read_only().expanded();
    section.mount().await;

    println!("{title} ({})", section.state().total_count);
    for tab in Tab::ALL {
        section.set_tab(tab).await;
        println!("── {} ──", tab.label());
        print!("{}", section.view());
    }
}
