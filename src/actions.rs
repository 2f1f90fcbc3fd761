//! Mutations: everything that writes to the backend, plus the local theme preference.

use std::fmt;
use std::str::FromStr;

use crate::context::Services;
use crate::db::{Database, THEME_KEY};
use crate::error::ClientError;
use crate::files::UploadFile;
use crate::models::{Application, ApplicationStatus, Company, Job, Ref, User};
use crate::profile::ProfileUpdate;
use crate::store::{Action, ApplicationAction, AuthAction, CompanyAction, JobsAction, Store};
use crate::validate::{self, CompanyForm, JobForm};

// --- Recruiter ---

/// Validates before anything is sent; an invalid form never reaches the backend.
pub fn post_job(services: &Services, store: &mut Store, form: &JobForm) -> Result<Job, ClientError> {
    let new_job = services.report("post job", form.validate())?;
    let reply = services.report("post job", services.backend.post_job(&new_job))?;

    let mut admin_jobs = store.state().jobs.all_admin_jobs.clone();
    admin_jobs.insert(0, reply.data.clone());
    store.dispatch(Action::Jobs(JobsAction::SetAllAdminJobs(admin_jobs)));

    tracing::info!(job = %reply.data.id, title = %reply.data.title, "job posted");
    services.notifier.success(&reply.message);
    Ok(reply.data)
}

pub fn register_company(services: &Services, store: &mut Store, name: &str) -> Result<Company, ClientError> {
    let name = name.trim();
    if name.is_empty() {
        return services.report("register company", Err(ClientError::validation("Company name is required")));
    }
    let reply = services.report("register company", services.backend.register_company(name))?;
    store.dispatch(Action::Companies(CompanyAction::SetSingleCompany(Some(reply.data.clone()))));
    services.notifier.success(&reply.message);
    Ok(reply.data)
}

pub fn update_company(
    services: &Services,
    store: &mut Store,
    company_id: &str,
    form: &CompanyForm,
) -> Result<Company, ClientError> {
    let update = services.report("update company", form.validate())?;
    let reply = services.report("update company", services.backend.update_company(company_id, &update))?;
    store.dispatch(Action::Companies(CompanyAction::SetSingleCompany(Some(reply.data.clone()))));
    services.notifier.success(&reply.message);
    Ok(reply.data)
}

pub fn update_status(
    services: &Services,
    store: &mut Store,
    application_id: &str,
    status: ApplicationStatus,
) -> Result<(), ClientError> {
    let reply = services.report("update status", services.backend.update_status(application_id, status))?;
    store.dispatch(Action::Applications(ApplicationAction::SetStatus {
        application_id: application_id.to_string(),
        status,
    }));
    services.notifier.success(&reply.message);
    Ok(())
}

// --- Student ---

/// Applies to a job. When that job is the one on screen, it is marked as
/// applied in place so the detail view reflects it without a refetch.
pub fn apply(services: &Services, store: &mut Store, job_id: &str) -> Result<(), ClientError> {
    let Some(user_id) = store.user().map(|user| user.id.clone()) else {
        return services.report("apply", Err(ClientError::validation("Please log in to apply")));
    };
    let current = store.state().jobs.single_job.clone().filter(|job| job.id == job_id);
    if current.as_ref().is_some_and(|job| job.has_applicant(&user_id)) {
        return services.report(
            "apply",
            Err(ClientError::validation("You have already applied for this job")),
        );
    }

    let reply = services.report("apply", services.backend.apply(job_id))?;

    if let Some(mut job) = current {
        job.applications.push(Ref::Populated(Box::new(Application {
            id: String::new(),
            job: Ref::Id(job_id.to_string()),
            applicant: Ref::Id(user_id),
            status: ApplicationStatus::Pending,
            created_at: Some(chrono::Utc::now()),
        })));
        store.dispatch(Action::Jobs(JobsAction::SetSingleJob(Some(job))));
    }
    services.notifier.success(&reply.message);
    Ok(())
}

// --- Profile ---

pub fn update_profile(services: &Services, store: &mut Store, update: &ProfileUpdate) -> Result<User, ClientError> {
    if store.user().is_none() {
        return services.report("update profile", Err(ClientError::validation("Please log in first")));
    }
    services.report("update profile", update.validate())?;
    let reply = services.report("update profile", services.backend.update_profile(update))?;

    store.dispatch(Action::Auth(AuthAction::SetUser(Some(reply.data.clone()))));
    services.report("save session", services.persist(store))?;
    services.notifier.success(&reply.message);
    Ok(reply.data)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Avatar,
    Cover,
}

/// Replaces the avatar or cover image, keeping every other profile field.
pub fn upload_image(
    services: &Services,
    store: &mut Store,
    slot: ImageSlot,
    image: UploadFile,
) -> Result<User, ClientError> {
    let Some(user) = store.user() else {
        return services.report("upload image", Err(ClientError::validation("Please log in first")));
    };
    services.report("upload image", validate::validate_image(&image))?;

    let mut update = ProfileUpdate::new(crate::profile::ProfileForm::from_user(user));
    match slot {
        ImageSlot::Avatar => update.profile_photo = Some(image),
        ImageSlot::Cover => update.cover_image = Some(image),
    }
    update_profile(services, store, &update)
}

// --- Preferences ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

pub fn theme(db: &Database) -> anyhow::Result<Theme> {
    let stored = db.get(THEME_KEY)?;
    Ok(stored
        .and_then(|value| value.parse().ok())
        .unwrap_or_default())
}

pub fn set_theme(db: &Database, theme: Theme) -> anyhow::Result<()> {
    db.set(THEME_KEY, &theme.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::testing::{self, job, FakeBackend, Harness};

    fn job_form() -> JobForm {
        JobForm {
            title: "Rust Developer".into(),
            description: "Build services".into(),
            requirements: "Rust, SQL".into(),
            salary: "12".into(),
            location: "Remote".into(),
            job_type: "Full Time".into(),
            experience: "2".into(),
            position: "1".into(),
            company_id: "c1".into(),
        }
    }

    fn store_with(role: Role) -> Store {
        let mut store = Store::new();
        store.dispatch(Action::Auth(AuthAction::SetUser(Some(testing::user(role)))));
        store
    }

    #[test]
    fn test_negative_salary_fails_before_network() {
        let h = Harness::new();
        let services = h.services();
        let mut store = store_with(Role::Recruiter);
        let form = JobForm {
            salary: "-5".into(),
            ..job_form()
        };

        let err = post_job(&services, &mut store, &form).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(h.backend.call_count(), 0);
        assert_eq!(h.notifier.errors(), vec!["Salary must be a positive number"]);
    }

    #[test]
    fn test_post_job_prepends_to_admin_jobs() {
        let h = Harness::with_backend(FakeBackend::with_jobs(vec![job("j1", "Old", None)]));
        let services = h.services();
        let mut store = store_with(Role::Recruiter);
        store.dispatch(Action::Jobs(JobsAction::SetAllAdminJobs(vec![job("j1", "Old", None)])));

        let posted = post_job(&services, &mut store, &job_form()).unwrap();
        assert_eq!(posted.id, "new-job");
        let ids: Vec<_> = store.state().jobs.all_admin_jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["new-job", "j1"]);
    }

    #[test]
    fn test_apply_marks_single_job() {
        let h = Harness::with_backend(FakeBackend::with_jobs(vec![job("j1", "Rust Developer", Some("Acme"))]));
        let services = h.services();
        let mut store = store_with(Role::Student);
        store.dispatch(Action::Jobs(JobsAction::SetSingleJob(Some(job("j1", "Rust Developer", Some("Acme"))))));

        apply(&services, &mut store, "j1").unwrap();
        let single = store.state().jobs.single_job.as_ref().unwrap();
        assert!(single.has_applicant("u1"));

        let err = apply(&services, &mut store, "j1").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(h.backend.calls(), vec!["apply j1"]);
    }

    #[test]
    fn test_apply_requires_login() {
        let h = Harness::new();
        let services = h.services();
        let mut store = Store::new();
        assert!(apply(&services, &mut store, "j1").is_err());
        assert_eq!(h.backend.call_count(), 0);
    }

    #[test]
    fn test_register_company_sets_single_company() {
        let h = Harness::new();
        let services = h.services();
        let mut store = store_with(Role::Recruiter);

        assert!(register_company(&services, &mut store, "  ").is_err());
        let company = register_company(&services, &mut store, "Acme").unwrap();
        assert_eq!(company.id, "c-new");
        assert_eq!(store.state().companies.single_company.as_ref().unwrap().name, "Acme");
    }

    #[test]
    fn test_update_company_validates_website() {
        let h = Harness::new();
        let services = h.services();
        let mut store = store_with(Role::Recruiter);
        let form = CompanyForm {
            name: "Acme".into(),
            website: "acme.com".into(),
            ..Default::default()
        };
        assert!(update_company(&services, &mut store, "c1", &form).is_err());
        assert_eq!(h.backend.call_count(), 0);

        let form = CompanyForm {
            website: "https://acme.com".into(),
            ..form
        };
        let company = update_company(&services, &mut store, "c1", &form).unwrap();
        assert_eq!(company.website.as_deref(), Some("https://acme.com"));
    }

    #[test]
    fn test_upload_avatar_rejects_pdf() {
        let h = Harness::new();
        let services = h.services();
        let mut store = store_with(Role::Student);
        let pdf = UploadFile::new("me.pdf", vec![0; 10]);
        assert!(upload_image(&services, &mut store, ImageSlot::Avatar, pdf).is_err());
        assert_eq!(h.backend.call_count(), 0);

        let png = UploadFile::new("me.png", vec![0; 10]);
        upload_image(&services, &mut store, ImageSlot::Avatar, png).unwrap();
        let update = h.backend.last_profile_update.lock().unwrap().clone().unwrap();
        assert_eq!(update.profile_photo.unwrap().file_name, "me.png");
        assert!(update.cover_image.is_none());
    }

    #[test]
    fn test_theme_round_trip() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(theme(&db).unwrap(), Theme::Light);
        set_theme(&db, Theme::Dark).unwrap();
        assert_eq!(theme(&db).unwrap(), Theme::Dark);
        assert_eq!(db.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }
}
