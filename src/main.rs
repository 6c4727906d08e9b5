use std::process;

use carewell::{
    application::{blog::PostDetail, error::AppError, site::SiteContext},
    config::{self, Command, ContentCommand, DoctorsArgs, PostsCommand, ScheduleCommand},
    domain::{
        doctors::{DoctorFilter, VisibleWindow},
        images::{ImageArea, resolve_image},
        navigation::Route,
        schedule::TimeSlot,
    },
    infra::telemetry,
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(error.exit_code());
    }
}

fn report_application_error(error: &AppError) {
    let report = error.report();
    if dispatcher::has_been_set() {
        error!(error = %report.chain(), source = report.source, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %report.chain(), source = report.source, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;
    telemetry::init(&settings.logging)?;

    let site = SiteContext::from_settings(&settings).await?;

    match cli_args.command {
        Command::Content(command) => run_content(&site, command).await,
        Command::Posts(command) => run_posts(&site, command).await,
        Command::Doctors(args) => run_doctors(&site, args),
        Command::Schedule(command) => run_schedule(&site, command).await,
        Command::Route(args) => {
            let route = Route::from_fragment(&args.fragment);
            print_json(&json!({
                "fragment": route.fragment(),
                "requires_admin": route.requires_admin(),
            }))
        }
    }
}

async fn run_content(site: &SiteContext, command: ContentCommand) -> Result<(), AppError> {
    match command {
        ContentCommand::Get { path } => {
            let value = site.content.get(&path).ok_or(AppError::NotFound)?;
            print_json(&value)
        }
        ContentCommand::Set(args) => {
            let value = parse_value(&args.value);
            let path = args.path;
            let write = args.admin.write;

            let (change, saved) = site
                .as_admin(&args.admin.actor, |actor| async move {
                    let change = site.admin_content.update_path(&actor, &path, value).await?;
                    let saved = if write {
                        site.persist_content().await?
                    } else {
                        None
                    };
                    Ok::<_, AppError>((change, saved))
                })
                .await?;

            print_json(&json!({
                "change": change,
                "saved_to": saved,
                "audit": site.audit.list_recent(site.audit_recent_limit.get()).await?,
            }))
        }
    }
}

async fn run_posts(site: &SiteContext, command: PostsCommand) -> Result<(), AppError> {
    let served = site.blog.refresh().await;
    info!(target = "carewell::posts", served, "posts loaded");

    match command {
        PostsCommand::List { category, page } => {
            print_json(&site.blog.listing(category.as_deref(), page))
        }
        PostsCommand::Show { id } => match site.blog.post_detail(&id) {
            detail @ PostDetail::NotFound { .. } => {
                print_json(&json!({ "id": id, "heading": detail.heading() }))?;
                Err(AppError::NotFound)
            }
            PostDetail::Found {
                post,
                image_src,
                related,
            } => print_json(&json!({
                "heading": post.title,
                "post": post,
                "image_src": image_src,
                "related": related,
            })),
        },
    }
}

fn run_doctors(site: &SiteContext, args: DoctorsArgs) -> Result<(), AppError> {
    let filter = DoctorFilter::new(args.query, args.specialty);
    let mut window = VisibleWindow::new(site.doctor_page_size.get() as usize);
    for _ in 0..args.more {
        window.load_more();
    }

    let cards = site.content.read(|content| {
        let doctors = content.doctors();
        let matched = filter.apply(&doctors);
        let shown: Vec<Value> = window
            .slice(&matched)
            .iter()
            .map(|doctor| {
                json!({
                    "id": doctor.id,
                    "name": doctor.name,
                    "specialty": doctor.specialty,
                    "image_src": resolve_image(content, ImageArea::Doctors, &doctor.image),
                })
            })
            .collect();
        json!({
            "doctors": shown,
            "total": matched.len(),
            "has_more": window.has_more(matched.len()),
        })
    });
    print_json(&cards)
}

async fn run_schedule(site: &SiteContext, command: ScheduleCommand) -> Result<(), AppError> {
    match command {
        ScheduleCommand::Slots { doctor_id, date } => {
            let schedules = site.content.schedules();
            print_json(&json!({
                "doctor_id": doctor_id,
                "date": date,
                "slots": schedules.available_slots(&doctor_id, &date),
                "scheduled_dates": schedules.dates_for(&doctor_id),
            }))
        }
        ScheduleCommand::Toggle {
            doctor_id,
            date,
            slot,
            admin,
        } => {
            let slot: TimeSlot = slot.parse()?;
            let write = admin.write;

            let (outcome, saved) = site
                .as_admin(&admin.actor, |actor| {
                    let (doctor_id, date) = (&doctor_id, &date);
                    async move {
                        let outcome = site
                            .admin_content
                            .toggle_schedule_slot(&actor, doctor_id, date, slot)
                            .await?;
                        let saved = if write {
                            site.persist_content().await?
                        } else {
                            None
                        };
                        Ok::<_, AppError>((outcome, saved))
                    }
                })
                .await?;

            print_json(&json!({
                "outcome": format!("{outcome:?}"),
                "slots": site.content.schedules().available_slots(&doctor_id, &date),
                "saved_to": saved,
            }))
        }
    }
}

/// JSON when it parses, otherwise the raw text as a string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::unexpected(format!("failed to encode output: {err}")))?;
    println!("{text}");
    Ok(())
}
