mod actions;
mod api;
mod chat;
mod config;
mod context;
mod db;
mod error;
mod fetch;
mod files;
mod filter;
mod models;
mod notify;
mod profile;
mod resume;
mod routes;
mod session;
mod store;
#[cfg(test)]
mod testing;
mod tui;
mod upload;
mod validate;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use actions::{ImageSlot, Theme};
use api::{HttpBackend, HttpResumeParser, ResumeParser};
use chat::{ChatWidget, KeywordResponder, LineRecognizer, TerminalSynthesizer};
use config::Config;
use context::Services;
use db::Database;
use error::ClientError;
use filter::{SearchMode, SearchQuery};
use models::{Application, ApplicationStatus, Certification, Company, Education, Experience, Job, Language, Role, User};
use notify::ConsoleNotifier;
use profile::{split_list, ProfileForm, ProfileUpdate, Section};
use resume::split_date_range;
use routes::{guard, Navigation, Route};
use store::{ScopeId, Store};
use upload::ResumeUploader;
use validate::{CompanyForm, JobForm, LoginForm, SignupForm};

#[derive(Parser)]
#[command(name = "jobboard")]
#[command(about = "Job board client - browse and apply for jobs, manage companies and applicants")]
struct Cli {
    /// Only print errors to stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[arg(short, long, value_enum)]
        role: Role,
    },

    /// Create an account
    Signup {
        #[arg(long)]
        fullname: String,

        #[arg(short, long)]
        email: String,

        /// Digits only, 7 to 15 of them
        #[arg(long)]
        phone: String,

        #[arg(short, long)]
        password: String,

        #[arg(short, long, value_enum)]
        role: Role,

        /// Profile photo (JPEG, PNG or WEBP, up to 2 MB)
        #[arg(long)]
        photo: Option<PathBuf>,
    },

    /// End the session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List jobs, optionally searching titles, companies and job types
    Jobs {
        /// Search text
        query: Option<String>,

        /// Treat the search text as a regular expression
        #[arg(long)]
        regex: bool,
    },

    /// Show job details
    Show {
        /// Job ID
        id: String,
    },

    /// Apply for a job
    Apply {
        /// Job ID
        id: String,
    },

    /// List the jobs you applied for
    Applied,

    /// Browse jobs interactively
    Browse,

    /// Manage companies (recruiters)
    Company {
        #[command(subcommand)]
        command: CompanyCommands,
    },

    /// Manage posted jobs (recruiters)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// List applicants for one of your jobs (recruiters)
    Applicants {
        /// Job ID
        job_id: String,
    },

    /// Set an application's status (recruiters)
    Status {
        /// Application ID
        application_id: String,

        #[arg(value_enum)]
        status: ApplicationStatus,
    },

    /// View and edit your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Show or set the colour theme
    Theme {
        #[arg(value_enum)]
        theme: Option<Theme>,
    },

    /// Check whether this session may open a page, e.g. /admin/companies
    Open {
        path: String,
    },

    /// Ask the help assistant (one line per question, Ctrl-D to leave)
    Chat {
        /// Do not echo replies through the speech output
        #[arg(long)]
        mute: bool,
    },
}

#[derive(Subcommand)]
enum CompanyCommands {
    /// List your companies
    List {
        /// Filter by name
        #[arg(short, long)]
        filter: Option<String>,

        #[arg(long)]
        regex: bool,
    },

    /// Register a company by name
    Create {
        name: String,
    },

    /// Show company details
    Show {
        /// Company ID
        id: String,
    },

    /// Update company information
    Update {
        /// Company ID
        id: String,

        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "")]
        website: String,

        #[arg(long, default_value = "")]
        location: String,

        /// Logo image (JPEG, PNG or WEBP, up to 2 MB)
        #[arg(long)]
        logo: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// List the jobs you posted
    Jobs {
        /// Filter by title or company
        #[arg(short, long)]
        filter: Option<String>,

        #[arg(long)]
        regex: bool,
    },

    /// Post a new job
    Post {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        /// Comma-separated
        #[arg(long, default_value = "")]
        requirements: String,

        /// In LPA
        #[arg(long, allow_hyphen_values = true)]
        salary: String,

        #[arg(long)]
        location: String,

        #[arg(long)]
        job_type: String,

        /// Years of experience
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        experience: String,

        /// Number of openings
        #[arg(long, default_value = "1", allow_hyphen_values = true)]
        positions: String,

        /// Company ID or name
        #[arg(long)]
        company: String,
    },

    /// Show application statistics
    Dashboard,
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show your profile
    Show,

    /// Change profile fields
    Set {
        #[arg(long)]
        fullname: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        bio: Option<String>,

        /// Comma-separated; replaces the current list
        #[arg(long)]
        skills: Option<String>,

        /// Comma-separated
        #[arg(long)]
        interests: Option<String>,

        /// Comma-separated
        #[arg(long)]
        job_types: Option<String>,

        #[arg(long)]
        salary: Option<f64>,

        #[arg(long)]
        linkedin: Option<String>,

        #[arg(long)]
        github: Option<String>,

        #[arg(long)]
        portfolio: Option<String>,
    },

    /// Add an education entry
    AddEducation {
        #[arg(long)]
        institution: String,

        #[arg(long, default_value = "")]
        degree: String,

        #[arg(long, default_value = "")]
        field: String,

        /// A range such as "2019 - 2023" or "2021 - Present"
        #[arg(long)]
        dates: Option<String>,

        #[arg(long)]
        grade: Option<String>,

        /// Replace the entry at this position instead of adding one
        #[arg(long)]
        replace: Option<usize>,
    },

    /// Add an experience entry
    AddExperience {
        #[arg(long)]
        company: String,

        #[arg(long)]
        position: String,

        #[arg(long, default_value = "")]
        location: String,

        /// A range such as "Jan 2020 - Present"
        #[arg(long)]
        dates: Option<String>,

        #[arg(long, default_value = "")]
        description: String,

        /// Replace the entry at this position instead of adding one
        #[arg(long)]
        replace: Option<usize>,
    },

    /// Add a language
    AddLanguage {
        name: String,

        #[arg(long, default_value = "")]
        proficiency: String,
    },

    /// Add a certification
    AddCertification {
        name: String,

        #[arg(long, default_value = "")]
        issuer: String,

        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        url: Option<String>,
    },

    /// Remove an entry by its position (as shown by `profile show`)
    Remove {
        #[arg(value_enum)]
        section: Section,

        index: usize,
    },

    /// Upload a resume (PDF, DOC or DOCX up to 5 MB) and merge what it contains
    UploadResume {
        file: PathBuf,

        /// Upload without parsing
        #[arg(long)]
        no_parse: bool,
    },

    /// Replace the profile photo
    Photo {
        file: PathBuf,
    },

    /// Replace the cover image
    Cover {
        file: PathBuf,
    },
}

fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Client errors were already shown as notifications.
            if e.downcast_ref::<ClientError>().is_none() {
                eprintln!("error: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(&config.log_level);

    let db = Database::open(config.data_dir.as_deref())?;
    tracing::debug!(path = %db.path().display(), api = %config.api_url, "starting");
    let mut store = Store::rehydrate(db.load_state()?);
    let backend = HttpBackend::new(&config.api_url, db.access_token()?);
    let notifier = ConsoleNotifier { quiet: cli.quiet };
    let services = Services::new(&backend, &db, &notifier);

    let scope = store.open_scope();
    let result = run(cli.command, &config, &services, &mut store, scope);
    store.close_scope(scope);
    result
}

/// Refuses a command whose screen the current session may not open.
fn ensure_allowed(services: &Services, store: &Store, route: Route) -> Result<(), ClientError> {
    match guard(store.user(), &route) {
        Navigation::Allow => Ok(()),
        Navigation::Redirect(to) => {
            let message = match to {
                Route::Login => format!("Please log in to open {}", route),
                _ => format!("{} is only available to recruiters", route),
            };
            tracing::debug!(from = %route, to = %to, "route guard redirect");
            services.report("navigate", Err(ClientError::validation(message)))
        }
    }
}

fn run(command: Commands, config: &Config, services: &Services, store: &mut Store, scope: ScopeId) -> Result<()> {
    match command {
        Commands::Login { email, password, role } => {
            let form = LoginForm {
                email,
                password,
                role: Some(role),
            };
            let next = session::login(services, store, &form)?;
            println!("Logged in. Next: {}", next);
        }

        Commands::Signup {
            fullname,
            email,
            phone,
            password,
            role,
            photo,
        } => {
            let profile_photo = match photo {
                Some(path) => Some(files::UploadFile::from_path(&path)?),
                None => None,
            };
            let form = SignupForm {
                fullname,
                email,
                phone_number: phone,
                password,
                role: Some(role),
                profile_photo,
            };
            let next = session::signup(services, &form)?;
            println!("Account created. Next: jobboard login ({})", next);
        }

        Commands::Logout => {
            session::logout(services, store)?;
            println!("Logged out.");
        }

        Commands::Whoami => match store.user() {
            Some(user) => {
                println!("{} <{}>", user.fullname, user.email);
                println!("Role: {}", user.role);
                println!("ID: {}", user.id);
                let token = services.db.access_token()?;
                println!("Token: {}", if token.is_some() { "stored" } else { "missing" });
            }
            None => println!("Not logged in."),
        },

        Commands::Jobs { query, regex } => {
            let query = query.unwrap_or_default();
            let mode = if regex { SearchMode::Regex } else { SearchMode::Literal };
            let matcher = services.report("search", SearchQuery::new(&query, mode))?;
            // Patterns are matched locally, so regex searches fetch the full listing.
            let keyword = if regex { "" } else { query.as_str() };
            fetch::search_jobs(services, store, scope, keyword)?;
            let jobs = filter::filter_jobs(&store.state().jobs.all_jobs, &matcher);
            print_jobs(&jobs);
        }

        Commands::Show { id } => {
            fetch::fetch_single_job(services, store, scope, &id)?;
            if let Some(job) = &store.state().jobs.single_job {
                print_job(job, store.user());
            }
        }

        Commands::Apply { id } => {
            fetch::fetch_single_job(services, store, scope, &id)?;
            actions::apply(services, store, &id)?;
            if let Some(job) = &store.state().jobs.single_job {
                println!("Applied for '{}' at {}.", job.title, job.company_name());
            }
        }

        Commands::Applied => {
            fetch::fetch_applied_jobs(services, store, scope)?;
            print_applications(&store.state().jobs.all_applied_jobs);
        }

        Commands::Browse => {
            tui::run_browse(services.backend, services.db, store)?;
        }

        Commands::Company { command } => run_company(command, services, store, scope)?,

        Commands::Admin { command } => run_admin(command, services, store, scope)?,

        Commands::Applicants { job_id } => {
            ensure_allowed(services, store, Route::AdminApplicants(job_id.clone()))?;
            fetch::fetch_applicants(services, store, scope, &job_id)?;
            if let Some(job) = &store.state().applications.applicants {
                print_applicants(job);
            }
        }

        Commands::Status {
            application_id,
            status,
        } => {
            ensure_allowed(services, store, Route::AdminJobs)?;
            actions::update_status(services, store, &application_id, status)?;
            println!("Application {} is now {}.", application_id, status);
        }

        Commands::Profile { command } => {
            ensure_allowed(services, store, Route::Profile)?;
            run_profile(command, config, services, store)?;
        }

        Commands::Theme { theme } => match theme {
            Some(theme) => {
                actions::set_theme(services.db, theme)?;
                println!("Theme set to {}.", theme);
            }
            None => println!("{}", actions::theme(services.db)?),
        },

        Commands::Open { path } => {
            let route = Route::parse(&path);
            match guard(store.user(), &route) {
                Navigation::Allow => println!("{}: allowed", route),
                Navigation::Redirect(to) => println!("{}: redirected to {}", route, to),
            }
        }

        Commands::Chat { mute } => {
            let stdin = std::io::stdin();
            let mut widget = ChatWidget::new(
                LineRecognizer::new(stdin.lock()),
                TerminalSynthesizer::new(std::io::stdout()),
                KeywordResponder,
            );
            widget.speak_replies = !mute;
            println!("Ask me anything about the job board. Ctrl-D to leave.");
            loop {
                match widget.listen() {
                    Ok(Some(turn)) if mute => println!("assistant> {}", turn.text),
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!(error = %e, "chat ended");
                        break;
                    }
                }
            }
            widget.stop_listening();
            tracing::debug!(turns = widget.transcript().len(), "chat closed");
        }
    }

    Ok(())
}

fn run_company(command: CompanyCommands, services: &Services, store: &mut Store, scope: ScopeId) -> Result<()> {
    match command {
        CompanyCommands::List { filter, regex } => {
            ensure_allowed(services, store, Route::AdminCompanies)?;
            let mode = if regex { SearchMode::Regex } else { SearchMode::Literal };
            let text = filter.unwrap_or_default();
            let matcher = services.report("filter", SearchQuery::new(&text, mode))?;
            store.dispatch(store::Action::Companies(store::CompanyAction::SetSearchCompanyByText(text)));
            fetch::fetch_companies(services, store, scope)?;
            let companies = filter::filter_companies(&store.state().companies.companies, &matcher);
            print_companies(&companies);
        }

        CompanyCommands::Create { name } => {
            ensure_allowed(services, store, Route::AdminCompanyCreate)?;
            let company = actions::register_company(services, store, &name)?;
            println!("Registered '{}' (ID: {}).", company.name, company.id);
            println!("Next: jobboard company update {} --name \"{}\" ...", company.id, company.name);
        }

        CompanyCommands::Show { id } => {
            ensure_allowed(services, store, Route::AdminCompany(id.clone()))?;
            fetch::fetch_single_company(services, store, scope, &id)?;
            if let Some(company) = &store.state().companies.single_company {
                print_company(company);
            }
        }

        CompanyCommands::Update {
            id,
            name,
            description,
            website,
            location,
            logo,
        } => {
            ensure_allowed(services, store, Route::AdminCompany(id.clone()))?;
            let logo = match logo {
                Some(path) => Some(files::UploadFile::from_path(&path)?),
                None => None,
            };
            let form = CompanyForm {
                name,
                description,
                website,
                location,
                logo,
            };
            let company = actions::update_company(services, store, &id, &form)?;
            print_company(&company);
        }
    }
    Ok(())
}

fn run_admin(command: AdminCommands, services: &Services, store: &mut Store, scope: ScopeId) -> Result<()> {
    match command {
        AdminCommands::Jobs { filter, regex } => {
            ensure_allowed(services, store, Route::AdminJobs)?;
            let mode = if regex { SearchMode::Regex } else { SearchMode::Literal };
            let text = filter.unwrap_or_default();
            let matcher = services.report("filter", SearchQuery::new(&text, mode))?;
            store.dispatch(store::Action::Jobs(store::JobsAction::SetSearchJobByText(text)));
            fetch::fetch_admin_jobs(services, store, scope)?;
            let jobs = filter::filter_admin_jobs(&store.state().jobs.all_admin_jobs, &matcher);
            print_jobs(&jobs);
        }

        AdminCommands::Post {
            title,
            description,
            requirements,
            salary,
            location,
            job_type,
            experience,
            positions,
            company,
        } => {
            ensure_allowed(services, store, Route::AdminJobCreate)?;
            let mut form = JobForm {
                title,
                description,
                requirements,
                salary,
                location,
                job_type,
                experience,
                position: positions,
                company_id: company,
            };
            // The company lookup is a request, so an invalid form must fail first.
            services.report("post job", form.validate())?;
            form.company_id = resolve_company(services, store, scope, &form.company_id);
            let job = actions::post_job(services, store, &form)?;
            println!("Posted '{}' (ID: {}).", job.title, job.id);
        }

        AdminCommands::Dashboard => {
            ensure_allowed(services, store, Route::AdminDashboard)?;
            fetch::fetch_dashboard_stats(services, store, scope)?;
            if let Some(stats) = &store.state().dashboard.stats {
                println!("Jobs:         {}", stats.total_jobs);
                println!("Companies:    {}", stats.total_companies);
                println!("Applications: {}", stats.total_applications);
                for status in ApplicationStatus::ALL {
                    println!("  {:<11} {}", format!("{}:", status), stats.count_for(status));
                }
            }
        }
    }
    Ok(())
}

/// Accepts a company ID or a company name. A name that matches none of the
/// recruiter's companies is passed through as an ID and left to the backend.
fn resolve_company(services: &Services, store: &mut Store, scope: ScopeId, company: &str) -> String {
    let company = company.trim();
    if company.is_empty() || fetch::fetch_companies(services, store, scope).is_err() {
        return company.to_string();
    }
    store
        .state()
        .companies
        .companies
        .iter()
        .find(|c| c.id == company || c.name.eq_ignore_ascii_case(company))
        .map(|c| c.id.clone())
        .unwrap_or_else(|| company.to_string())
}

fn run_profile(command: ProfileCommands, config: &Config, services: &Services, store: &mut Store) -> Result<()> {
    let user = store.user().cloned().ok_or_else(|| anyhow!("Not logged in"))?;
    let mut form = ProfileForm::from_user(&user);

    let form = match command {
        ProfileCommands::Show => {
            print_profile(&user);
            return Ok(());
        }

        ProfileCommands::UploadResume { file, no_parse } => {
            let file = files::UploadFile::from_path(&file)?;
            let parser = match (&config.parser_url, no_parse) {
                (Some(url), false) => Some(HttpResumeParser::new(url)),
                _ => None,
            };
            let mut uploader = ResumeUploader::new(parser.as_ref().map(|p| p as &dyn ResumeParser));
            uploader.select(services, file)?;
            uploader.run(services, store)?;
            if let Some(user) = store.user() {
                print_profile(user);
            }
            return Ok(());
        }

        ProfileCommands::Photo { file } => {
            let image = files::UploadFile::from_path(&file)?;
            actions::upload_image(services, store, ImageSlot::Avatar, image)?;
            return Ok(());
        }

        ProfileCommands::Cover { file } => {
            let image = files::UploadFile::from_path(&file)?;
            actions::upload_image(services, store, ImageSlot::Cover, image)?;
            return Ok(());
        }

        ProfileCommands::Set {
            fullname,
            email,
            phone,
            bio,
            skills,
            interests,
            job_types,
            salary,
            linkedin,
            github,
            portfolio,
        } => {
            let replace = |slot: &mut String, value: Option<String>| {
                if let Some(value) = value {
                    *slot = value.trim().to_string();
                }
            };
            replace(&mut form.fullname, fullname);
            replace(&mut form.email, email);
            replace(&mut form.phone_number, phone);
            replace(&mut form.bio, bio);
            replace(&mut form.social_links.linkedin, linkedin);
            replace(&mut form.social_links.github, github);
            replace(&mut form.social_links.portfolio, portfolio);
            if let Some(skills) = skills {
                form.skills = split_list(&skills);
            }
            if let Some(interests) = interests {
                form.interests = split_list(&interests);
            }
            if let Some(job_types) = job_types {
                form.preferred_job_types = split_list(&job_types);
            }
            if salary.is_some() {
                form.expected_salary = salary;
            }
            form
        }

        ProfileCommands::AddEducation {
            institution,
            degree,
            field,
            dates,
            grade,
            replace,
        } => {
            let range = split_date_range(dates.as_deref().unwrap_or(""));
            let entry = Education {
                institution,
                degree,
                field_of_study: field,
                start_date: range.start,
                end_date: range.end,
                current: range.current,
                grade: grade.unwrap_or_default(),
            };
            match replace {
                Some(index) => services.report("edit entry", form.update_education(index, entry))?,
                None => form.education.push(entry),
            }
            form
        }

        ProfileCommands::AddExperience {
            company,
            position,
            location,
            dates,
            description,
            replace,
        } => {
            let range = split_date_range(dates.as_deref().unwrap_or(""));
            let entry = Experience {
                company,
                position,
                location,
                start_date: range.start,
                end_date: range.end,
                current: range.current,
                description,
            };
            match replace {
                Some(index) => services.report("edit entry", form.update_experience(index, entry))?,
                None => form.experience.push(entry),
            }
            form
        }

        ProfileCommands::AddLanguage { name, proficiency } => {
            form.languages.push(Language { name, proficiency });
            form
        }

        ProfileCommands::AddCertification {
            name,
            issuer,
            date,
            url,
        } => {
            form.certifications.push(Certification {
                name,
                issuer,
                issue_date: date.unwrap_or_default(),
                credential_url: url.unwrap_or_default(),
            });
            form
        }

        ProfileCommands::Remove { section, index } => {
            services.report("remove entry", form.remove_entry(section, index))?;
            form
        }
    };

    let updated = actions::update_profile(services, store, &ProfileUpdate::new(form))?;
    print_profile(&updated);
    Ok(())
}

// --- Output ---

fn print_jobs(jobs: &[&Job]) {
    if jobs.is_empty() {
        println!("No jobs found.");
        return;
    }
    let now = chrono::Utc::now();
    println!(
        "{:<26} {:<30} {:<20} {:<12} {:>8} {:>8}",
        "ID", "TITLE", "COMPANY", "TYPE", "SALARY", "POSTED"
    );
    println!("{}", "-".repeat(109));
    for job in jobs {
        let posted = match job.days_since_posted(now) {
            Some(0) => "today".to_string(),
            Some(days) => format!("{}d ago", days),
            None => "-".to_string(),
        };
        println!(
            "{:<26} {:<30} {:<20} {:<12} {:>8} {:>8}",
            truncate(&job.id, 26),
            truncate(&job.title, 28),
            truncate(job.company_name(), 18),
            truncate(&job.job_type, 12),
            format!("{} LPA", job.salary),
            posted
        );
    }
}

fn print_job(job: &Job, user: Option<&User>) {
    println!("Job {}", job.id);
    println!("Title: {}", job.title);
    println!("Company: {}", job.company_name());
    if !job.location.is_empty() {
        println!("Location: {}", job.location);
    }
    if !job.job_type.is_empty() {
        println!("Type: {}", job.job_type);
    }
    println!("Salary: {} LPA", job.salary);
    println!("Experience: {} yrs", job.experience_level);
    println!("Openings: {}", job.position);
    println!("Applicants: {}", job.applications.len());
    if let Some(created) = job.created_at {
        println!("Posted: {}", created.format("%Y-%m-%d"));
    }
    if user.is_some_and(|user| job.has_applicant(&user.id)) {
        println!("You have applied for this job.");
    }
    if !job.requirements.is_empty() {
        println!("\nRequirements:");
        for requirement in &job.requirements {
            println!("  - {}", requirement);
        }
    }
    if !job.description.trim().is_empty() {
        println!("\n--- Description ---\n{}", textwrap::fill(&job.description, 80));
    }
}

fn print_applications(applications: &[Application]) {
    if applications.is_empty() {
        println!("You haven't applied to any job yet.");
        return;
    }
    println!("{:<12} {:<30} {:<20} {:<10}", "DATE", "JOB ROLE", "COMPANY", "STATUS");
    println!("{}", "-".repeat(75));
    for application in applications {
        let date = application
            .created_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let (title, company) = match application.job.populated() {
            Some(job) => (job.title.as_str(), job.company_name()),
            None => (application.job.id(), models::COMPANY_PLACEHOLDER),
        };
        println!(
            "{:<12} {:<30} {:<20} {:<10}",
            date,
            truncate(title, 28),
            truncate(company, 18),
            application.status.as_str().to_uppercase()
        );
    }
}

fn print_applicants(job: &Job) {
    println!("Applicants for '{}' ({})", job.title, job.applications.len());
    if job.applications.is_empty() {
        return;
    }
    println!(
        "{:<26} {:<22} {:<26} {:<14} {:<10} {:<12}",
        "APPLICATION", "NAME", "EMAIL", "PHONE", "STATUS", "DATE"
    );
    println!("{}", "-".repeat(115));
    for application in &job.applications {
        let Some(app) = application.populated() else {
            println!("{:<26} (details unavailable)", truncate(application.id(), 26));
            continue;
        };
        let (name, email, phone) = match app.applicant.populated() {
            Some(user) => (user.fullname.as_str(), user.email.as_str(), user.phone_number.as_str()),
            None => ("NA", "NA", "NA"),
        };
        let date = app
            .created_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<26} {:<22} {:<26} {:<14} {:<10} {:<12}",
            truncate(&app.id, 26),
            truncate(name, 20),
            truncate(email, 24),
            truncate(phone, 14),
            app.status,
            date
        );
        if let Some(resume) = app.applicant.populated().and_then(|u| u.profile.resume.as_deref()) {
            println!("{:<26} resume: {}", "", resume);
        }
    }
}

fn print_companies(companies: &[&Company]) {
    if companies.is_empty() {
        println!("You haven't registered any company yet.");
        return;
    }
    println!("{:<26} {:<30} {:<12}", "ID", "NAME", "CREATED");
    println!("{}", "-".repeat(70));
    for company in companies {
        let created = company
            .created_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<26} {:<30} {:<12}",
            truncate(&company.id, 26),
            truncate(&company.name, 28),
            created
        );
    }
}

fn print_company(company: &Company) {
    println!("Company {}", company.id);
    println!("Name: {}", company.name);
    for (label, value) in [
        ("Description", &company.description),
        ("Website", &company.website),
        ("Location", &company.location),
        ("Logo", &company.logo),
    ] {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            println!("{}: {}", label, value);
        }
    }
}

fn print_profile(user: &User) {
    let profile = &user.profile;
    println!("{} <{}> ({})", user.fullname, user.email, user.role);
    if !user.phone_number.is_empty() {
        println!("Phone: {}", user.phone_number);
    }
    if !profile.bio.trim().is_empty() {
        println!("\n{}", textwrap::fill(&profile.bio, 80));
    }
    if !profile.skills.is_empty() {
        println!("\nSkills: {}", profile.skills.join(", "));
    }
    if !profile.education.is_empty() {
        println!("\nEducation:");
        for (i, entry) in profile.education.iter().enumerate() {
            println!(
                "  [{}] {} - {} {} ({})",
                i,
                entry.institution,
                entry.degree,
                entry.field_of_study,
                date_span(&entry.start_date, &entry.end_date, entry.current)
            );
        }
    }
    if !profile.experience.is_empty() {
        println!("\nExperience:");
        for (i, entry) in profile.experience.iter().enumerate() {
            println!(
                "  [{}] {} at {} ({})",
                i,
                entry.position,
                entry.company,
                date_span(&entry.start_date, &entry.end_date, entry.current)
            );
        }
    }
    if !profile.languages.is_empty() {
        println!("\nLanguages:");
        for (i, language) in profile.languages.iter().enumerate() {
            println!("  [{}] {} {}", i, language.name, language.proficiency);
        }
    }
    if !profile.certifications.is_empty() {
        println!("\nCertifications:");
        for (i, cert) in profile.certifications.iter().enumerate() {
            println!("  [{}] {} - {}", i, cert.name, cert.issuer);
        }
    }
    if let Some(resume) = &profile.resume {
        let name = profile.resume_original_name.as_deref().unwrap_or("resume");
        println!("\nResume: {} ({})", name, resume);
    }
}

fn date_span(start: &str, end: &str, current: bool) -> String {
    let end = if current { "Present" } else { end };
    match (start.is_empty(), end.is_empty()) {
        (true, true) => "-".to_string(),
        (false, true) => start.to_string(),
        (true, false) => end.to_string(),
        (false, false) => format!("{} - {}", start, end),
    }
}

/// Cuts `s` to at most `max` characters, marking the cut with "...".
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long job title", 10), "a very ...");
        assert_eq!(truncate("Développeur Rust", 8), "Dével...");
    }

    #[test]
    fn test_date_span() {
        assert_eq!(date_span("2019", "2021", false), "2019 - 2021");
        assert_eq!(date_span("2021", "", true), "2021 - Present");
        assert_eq!(date_span("", "", false), "-");
    }

    fn post_command(salary: &str, company: &str) -> AdminCommands {
        AdminCommands::Post {
            title: "Rust Developer".into(),
            description: "Build services".into(),
            requirements: "Rust, SQL".into(),
            salary: salary.into(),
            location: "Remote".into(),
            job_type: "Full Time".into(),
            experience: "2".into(),
            positions: "1".into(),
            company: company.into(),
        }
    }

    fn recruiter_store() -> Store {
        let mut store = Store::new();
        store.dispatch(store::Action::Auth(store::AuthAction::SetUser(Some(testing::user(
            Role::Recruiter,
        )))));
        store
    }

    #[test]
    fn test_admin_post_rejects_negative_salary_without_requests() {
        let h = testing::Harness::new();
        let services = h.services();
        let mut store = recruiter_store();
        let scope = store.open_scope();

        let err = run_admin(post_command("-5", "Acme"), &services, &mut store, scope).unwrap_err();
        assert!(err.downcast_ref::<ClientError>().is_some_and(ClientError::is_validation));
        assert_eq!(h.backend.call_count(), 0);
        assert_eq!(h.notifier.errors(), vec!["Salary must be a positive number"]);
    }

    #[test]
    fn test_admin_post_resolves_company_name() {
        let h = testing::Harness::new();
        *h.backend.companies.lock().unwrap() = vec![Company {
            id: "c1".into(),
            name: "Acme".into(),
            ..Default::default()
        }];
        let services = h.services();
        let mut store = recruiter_store();
        let scope = store.open_scope();

        run_admin(post_command("12", "acme"), &services, &mut store, scope).unwrap();
        assert_eq!(h.backend.calls(), vec!["companies", "post_job Rust Developer"]);
        let posted = &store.state().jobs.all_admin_jobs[0];
        assert_eq!(posted.company.as_ref().map(|c| c.id()), Some("c1"));
    }

    #[test]
    fn test_cli_parses_negative_salary() {
        let cli = Cli::try_parse_from([
            "jobboard", "admin", "post", "--title", "Dev", "--description", "d", "--salary", "-5",
            "--location", "Remote", "--job-type", "Full Time", "--company", "Acme",
        ])
        .unwrap();
        match cli.command {
            Commands::Admin {
                command: AdminCommands::Post { salary, .. },
            } => assert_eq!(salary, "-5"),
            _ => panic!("expected admin post"),
        }
    }
}
