use std::io::IsTerminal;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use course_admin::api::{CatalogApi, CatalogHttpClient};
use course_admin::config::ApiConfig;
use course_admin::courses::CoursesPage;
use course_admin::display::{self, DisplayContext, Theme};
use course_admin::error::AppError;
use course_admin::instances::{FilterOutcome, InstancesPage};
use course_admin::models::{CourseId, InstanceId};
use course_admin::notice::Notice;
use course_admin::validation::FilterInput;

#[derive(Parser, Debug)]
#[command(name = "course-admin")]
#[command(about = "Manage courses and course instances of the catalog API", version)]
struct Cli {
    /// Base URL of the catalog API
    #[arg(long, global = true, env = "CATALOG_API_URL")]
    api_url: Option<String>,

    /// Output theme (light, dark, system)
    #[arg(long, global = true, env = "CATALOG_THEME")]
    theme: Option<Theme>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Course management
    #[command(subcommand)]
    Courses(CourseCommands),

    /// Course instance management
    #[command(subcommand)]
    Instances(InstanceCommands),
}

#[derive(Subcommand, Debug)]
enum CourseCommands {
    /// List all courses
    List,
    /// Show one course with its prerequisites
    Show { id: CourseId },
    /// Create a course
    Create {
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Prerequisite course id (repeatable)
        #[arg(long = "prereq")]
        prerequisites: Vec<CourseId>,
    },
    /// Edit a course
    Update {
        id: CourseId,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Add or remove a prerequisite (repeatable)
        #[arg(long = "toggle-prereq")]
        toggle: Vec<CourseId>,
    },
    /// Delete a course that no other course requires
    Delete { id: CourseId },
}

#[derive(Subcommand, Debug)]
enum InstanceCommands {
    /// List instances, optionally for one year and semester
    List {
        #[arg(long)]
        year: Option<String>,
        #[arg(long)]
        semester: Option<String>,
    },
    /// Show one instance
    Show {
        year: i32,
        semester: i32,
        id: InstanceId,
    },
    /// Schedule a course instance
    Create {
        /// Defaults to the first course
        #[arg(long)]
        course_id: Option<CourseId>,
        #[arg(long)]
        year: Option<String>,
        #[arg(long)]
        semester: Option<String>,
        #[arg(long)]
        instructor: String,
    },
    /// Edit an instance listed under YEAR/SEMESTER
    Update {
        year: i32,
        semester: i32,
        id: InstanceId,
        #[arg(long)]
        course_id: Option<CourseId>,
        #[arg(long)]
        set_year: Option<String>,
        #[arg(long)]
        set_semester: Option<String>,
        #[arg(long)]
        instructor: Option<String>,
    },
    /// Delete an instance listed under YEAR/SEMESTER
    Delete {
        year: i32,
        semester: i32,
        id: InstanceId,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "course_admin=warn".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let (ctx, api) = match startup(&cli) {
        Ok(started) => started,
        Err(e) => {
            let ctx = DisplayContext::plain();
            eprintln!("{}", display::notice(&ctx, &Notice::error("Configuration Error", e.to_string())));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Courses(command) => run_courses(&ctx, api, command).await,
        Commands::Instances(command) => run_instances(&ctx, api, command).await,
    };

    let failed = match result {
        Ok(()) => false,
        Err(AppError::Validation(errors)) => {
            eprintln!("Invalid data provided:");
            eprint!("{}", display::field_errors(&ctx, &errors));
            true
        }
        Err(e) => {
            debug!("command failed: {:?}", e);
            true
        }
    };

    ctx.unmount();
    if failed {
        std::process::exit(1);
    }
}

/// Environment config first, then `--api-url` and `--theme` on top.
fn startup(cli: &Cli) -> Result<(DisplayContext, Arc<dyn CatalogApi>), AppError> {
    let mut config = ApiConfig::new_from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url.as_str())?;
    }
    if let Some(theme) = cli.theme {
        config = config.with_theme(theme);
    }
    debug!("using catalog API at {}", config.base_url);

    let theme = config.theme;
    let api: Arc<dyn CatalogApi> = Arc::new(CatalogHttpClient::new(config)?);
    let color = !cli.no_color && std::io::stdout().is_terminal();
    Ok((DisplayContext::mount(theme, color), api))
}

/// Prints queued notices and returns whether any of them was an error.
fn print_notices(ctx: &DisplayContext, notices: Vec<Notice>) -> bool {
    let mut errored = false;
    for notice in notices {
        if notice.is_error() {
            errored = true;
            eprintln!("{}", display::notice(ctx, &notice));
        } else {
            println!("{}", display::notice(ctx, &notice));
        }
    }
    errored
}

/// Reports an error the controllers did not already turn into a notice.
fn report(ctx: &DisplayContext, result: Result<(), AppError>, reported: bool) -> Result<(), AppError> {
    if let Err(e) = &result {
        if !reported && !matches!(e, AppError::Validation(_)) {
            eprintln!("{}", display::notice(ctx, &Notice::error("Error", e.to_string())));
        }
    }
    result
}

async fn run_courses(
    ctx: &DisplayContext,
    api: Arc<dyn CatalogApi>,
    command: CourseCommands,
) -> Result<(), AppError> {
    let mut page = CoursesPage::new(api);
    let result = course_command(ctx, &mut page, command).await;
    let reported = print_notices(ctx, page.take_notices());
    report(ctx, result, reported)
}

async fn course_command(
    ctx: &DisplayContext,
    page: &mut CoursesPage,
    command: CourseCommands,
) -> Result<(), AppError> {
    page.load().await?;

    match command {
        CourseCommands::List => {
            print!("{}", display::course_table(ctx, page.courses()));
        }
        CourseCommands::Show { id } => {
            let details = page.view_details(id).await?.cloned();
            match details {
                Some(course) => {
                    let prerequisites = page.prerequisites_of(&course);
                    print!("{}", display::course_details(ctx, &course, &prerequisites));
                }
                None => println!("No course details found."),
            }
        }
        CourseCommands::Create {
            code,
            name,
            description,
            prerequisites,
        } => {
            page.open_create();
            let editor = page.editor_mut();
            editor.set_code(code);
            editor.set_name(name);
            editor.set_description(description);
            for id in prerequisites {
                if !editor.is_selected(id) {
                    editor.toggle_prerequisite(id)?;
                }
            }
            let course = page.submit_editor().await?;
            println!("{} - {} (id {})", course.code, course.name, course.id);
        }
        CourseCommands::Update {
            id,
            code,
            name,
            description,
            toggle,
        } => {
            page.open_edit(id)?;
            let editor = page.editor_mut();
            if let Some(code) = code {
                editor.set_code(code);
            }
            if let Some(name) = name {
                editor.set_name(name);
            }
            if let Some(description) = description {
                editor.set_description(description);
            }
            for prerequisite in toggle {
                editor.toggle_prerequisite(prerequisite)?;
            }
            let selected: Vec<String> = editor.selected().iter().map(|p| p.to_string()).collect();
            if !selected.is_empty() {
                println!("Selected prerequisites: {}", selected.join(", "));
            }
            page.submit_editor().await?;
        }
        CourseCommands::Delete { id } => page.delete(id).await?,
    }
    Ok(())
}

async fn run_instances(
    ctx: &DisplayContext,
    api: Arc<dyn CatalogApi>,
    command: InstanceCommands,
) -> Result<(), AppError> {
    let mut page = InstancesPage::new(api);
    let result = instance_command(ctx, &mut page, command).await;
    let reported = print_notices(ctx, page.take_notices());
    report(ctx, result, reported)
}

async fn instance_command(
    ctx: &DisplayContext,
    page: &mut InstancesPage,
    command: InstanceCommands,
) -> Result<(), AppError> {
    match command {
        InstanceCommands::List { year, semester } => {
            let input = FilterInput {
                year: year.unwrap_or_default(),
                semester: semester.unwrap_or_default(),
            };
            if page.apply_filter(input).await? == FilterOutcome::Ignored {
                let fields = page.filter_fields();
                if !fields.year.is_empty() || !fields.semester.is_empty() {
                    eprintln!("Both --year and --semester are needed to filter; listing all instances.");
                }
                page.clear_filters().await?;
            }
            print!("{}", display::instance_table(ctx, page.instances()));
        }
        InstanceCommands::Show { year, semester, id } => {
            match page.fetch_details(year, semester, id).await? {
                Some(instance) => print!("{}", display::instance_details(ctx, instance)),
                None => println!("No instance details found."),
            }
        }
        InstanceCommands::Create {
            course_id,
            year,
            semester,
            instructor,
        } => {
            page.load_courses().await?;
            page.open_create()?;
            let editor = page.editor_mut();
            match course_id {
                Some(course_id) => editor.set_course(course_id),
                None => {
                    let options = editor.course_options();
                    if let Some((_, label)) = options.first() {
                        eprintln!("No --course-id given; using {}.", label);
                    }
                    if options.len() > 1 {
                        let others: Vec<String> = options[1..]
                            .iter()
                            .map(|(id, label)| format!("{}: {}", id, label))
                            .collect();
                        eprintln!("Other courses: {}", others.join(", "));
                    }
                }
            }
            if let Some(year) = year {
                editor.set_year(year);
            }
            if let Some(semester) = semester {
                editor.set_semester(semester);
            }
            editor.set_instructor(instructor);
            let instance = page.submit_editor().await?;
            println!(
                "{} ({}) {}/{} - {}",
                instance.course_name,
                instance.course_code,
                instance.year,
                instance.semester,
                instance.instructor
            );
        }
        InstanceCommands::Update {
            year,
            semester,
            id,
            course_id,
            set_year,
            set_semester,
            instructor,
        } => {
            scope_to(page, year, semester).await?;
            page.load_courses().await?;
            page.open_edit(id)?;
            let editor = page.editor_mut();
            if let Some(course_id) = course_id {
                editor.set_course(course_id);
            }
            if let Some(year) = set_year {
                editor.set_year(year);
            }
            if let Some(semester) = set_semester {
                editor.set_semester(semester);
            }
            if let Some(instructor) = instructor {
                editor.set_instructor(instructor);
            }
            page.submit_editor().await?;
        }
        InstanceCommands::Delete { year, semester, id } => {
            scope_to(page, year, semester).await?;
            page.delete(id).await?;
        }
    }
    Ok(())
}

async fn scope_to(page: &mut InstancesPage, year: i32, semester: i32) -> Result<(), AppError> {
    let input = FilterInput {
        year: year.to_string(),
        semester: semester.to_string(),
    };
    page.apply_filter(input).await.map(|_| ())
}
