use chrono::{Local, Utc};
use clap::{Args, Subcommand};
use healthycheck::articles::ArticleFeed;
use healthycheck::checkup::{
    AssessmentId, AssessmentRecord, CheckupService, HistoryPager, ObservationForm, ResultView,
    SaveStatus,
};
use healthycheck::config::AppConfig;
use healthycheck::error::AppError;
use healthycheck::store::RemoteStore;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct EvaluateArgs {
    /// Sex of the child (M/F, Male/Female, L/P)
    #[arg(long)]
    pub(crate) gender: Option<String>,
    /// Age in whole months
    #[arg(long)]
    pub(crate) age_months: Option<String>,
    /// Body temperature in °C; leave out when not measured
    #[arg(long = "temp")]
    pub(crate) temperature: Option<String>,
    /// Vomiting episodes in the last 24 hours
    #[arg(long = "vomit")]
    pub(crate) vomit_count: Option<String>,
    /// Wet diapers in the last 24 hours
    #[arg(long = "wet-diapers")]
    pub(crate) wet_diaper_count: Option<String>,
    /// Appetite on the 1-5 slider
    #[arg(long)]
    pub(crate) appetite: Option<String>,
    /// Stools in the last 24 hours
    #[arg(long = "stool-freq")]
    pub(crate) stool_frequency: Option<String>,
    /// Stool color label (Brown, Yellow, Green, Pale White, Black, Bloody)
    #[arg(long = "stool-color")]
    pub(crate) stool_color: Option<String>,
    /// Symptom label; repeat for several
    #[arg(long = "symptom")]
    pub(crate) symptoms: Vec<String>,
    /// Save the assessment to the remote store
    #[arg(long)]
    pub(crate) save: bool,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl EvaluateArgs {
    fn form(&self) -> ObservationForm {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        ObservationForm {
            gender: text(&self.gender),
            age_months: text(&self.age_months),
            temperature_c: text(&self.temperature),
            vomit_count: text(&self.vomit_count),
            wet_diaper_count: text(&self.wet_diaper_count),
            appetite_score: text(&self.appetite),
            stool_frequency: text(&self.stool_frequency),
            stool_color: text(&self.stool_color),
            symptoms: self.symptoms.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub(crate) enum HistoryCommand {
    /// List saved assessments, newest first
    List(HistoryListArgs),
    /// Delete one saved assessment by its store key
    Delete {
        /// Store key of the assessment
        id: String,
    },
}

#[derive(Args, Debug)]
pub(crate) struct HistoryListArgs {
    /// Records per page (defaults to HISTORY_PAGE_SIZE)
    #[arg(long)]
    pub(crate) page_size: Option<usize>,
    /// Number of pages to load
    #[arg(long, default_value_t = 1)]
    pub(crate) pages: usize,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ArticlesCommand {
    /// List article titles
    List,
    /// Show one article; non-numeric ids open the first article
    Show {
        /// Article id (its position in the feed)
        id: String,
    },
}

fn remote_store() -> Result<(AppConfig, Arc<RemoteStore>), AppError> {
    let config = AppConfig::load()?;
    let store = RemoteStore::from_config(&config.store)?;
    Ok((config, Arc::new(store)))
}

pub(crate) async fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let observation = args.form().into_observation();

    if !args.save {
        return render_result(&ResultView::new(&observation), None, args.json);
    }

    let (config, store) = remote_store()?;
    let service = CheckupService::new(store, config.store.page_size);
    let outcome = service.evaluate_and_save(observation, Utc::now()).await;
    let saved_id = outcome.saved.as_ref().map(|record| &record.id);
    render_result(&outcome.view(), saved_id, args.json)?;

    if let SaveStatus::Failed(category) = outcome.status {
        eprintln!("{}", category.status_text());
    } else if !args.json {
        println!("{}", outcome.status.message());
    }
    Ok(())
}

fn render_result(
    view: &ResultView,
    saved_id: Option<&AssessmentId>,
    as_json: bool,
) -> Result<(), AppError> {
    if as_json {
        let mut payload = serde_json::to_value(view).map_err(std::io::Error::from)?;
        if let Some(id) = saved_id {
            payload["assessment_id"] = serde_json::Value::String(id.as_str().to_string());
        }
        let rendered = serde_json::to_string_pretty(&payload).map_err(std::io::Error::from)?;
        println!("{rendered}");
        return Ok(());
    }

    println!("Risk level: {} (score {})", view.level.name(), view.score);
    println!("{}", view.recommendation);
    if view.reasons.is_empty() {
        println!("No warning signs found.");
    } else {
        println!("Reasons:");
        for (reason, rule) in view.reasons.iter().zip(&view.breakdown) {
            println!("  - [{}] {} (+{})", reason.icon, reason.text, rule.weight);
        }
    }
    println!("Appetite: {}", view.appetite);
    if let Some(id) = saved_id {
        println!("Saved as {}", id.as_str());
    }
    Ok(())
}

pub(crate) async fn run_history(command: HistoryCommand) -> Result<(), AppError> {
    let (config, store) = remote_store()?;

    match command {
        HistoryCommand::List(args) => {
            let page_size = args.page_size.unwrap_or(config.store.page_size);
            let mut pager = HistoryPager::new(store, page_size);
            pager.refresh().await.map_err(report_failure)?;
            for _ in 1..args.pages {
                if pager.is_end_of_list() {
                    break;
                }
                pager.load_more().await.map_err(report_failure)?;
            }

            if pager.items().is_empty() {
                println!("No saved assessments yet.");
            }
            for record in pager.items() {
                render_history_entry(record);
            }
            if !pager.is_end_of_list() {
                println!("(more available: rerun with --pages {})", args.pages + 1);
            }
            Ok(())
        }
        HistoryCommand::Delete { id } => {
            let service = CheckupService::new(store, config.store.page_size);
            service.delete(&AssessmentId(id.clone())).await?;
            println!("Deleted {id}");
            Ok(())
        }
    }
}

fn report_failure(category: healthycheck::store::FailureCategory) -> AppError {
    AppError::Io(std::io::Error::other(category.status_text()))
}

fn render_history_entry(record: &AssessmentRecord) {
    let view = record.history_view();
    let recorded = record
        .summary
        .timestamp
        .with_timezone(&Local)
        .format("%d %b %Y %H:%M");
    println!(
        "{recorded}  {:<6} score {:>2}  {}",
        view.risk_level.name(),
        view.risk_score,
        view.id.as_str()
    );
    if let Some(appetite) = &view.appetite {
        println!("    appetite: {appetite}");
    }
    for reason in &view.reasons {
        println!("    - {}", reason.text);
    }
}

pub(crate) async fn run_articles(command: ArticlesCommand) -> Result<(), AppError> {
    let (_, store) = remote_store()?;
    let mut feed = ArticleFeed::new(store);

    let outcome = match command {
        ArticlesCommand::List => feed.load().await.map(|_| {
            for (index, article) in feed.articles().iter().enumerate() {
                println!("{index:>3}  {}", article.title);
            }
        }),
        ArticlesCommand::Show { id } => feed.open(&id).await.map(|article| {
            println!("{}\n", article.title);
            println!("{}\n", article.content);
            if !article.source_url.is_empty() {
                println!("Source: {}", article.source_url);
            }
        }),
    };

    outcome.map_err(|err| {
        if let Some(message) = feed.error_message() {
            eprintln!("{message}");
        }
        AppError::from(err)
    })
}
