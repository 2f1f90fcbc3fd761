//! In-memory backend and parser fakes shared by the flow tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::{Backend, CompanyUpdate, LoginRequest, LoginResponse, NewJob, Reply, ResumeParser, SignupRequest};
use crate::context::Services;
use crate::db::Database;
use crate::error::ClientError;
use crate::files::UploadFile;
use crate::models::{Application, ApplicationStatus, Company, DashboardStats, Job, Ref, Role, User};
use crate::notify::RecordingNotifier;
use crate::profile::ProfileUpdate;
use crate::resume::ParsedResume;

pub fn user(role: Role) -> User {
    User {
        id: "u1".to_string(),
        fullname: "Test User".to_string(),
        email: "user@test.com".to_string(),
        phone_number: "5551234567".to_string(),
        role,
        profile: Default::default(),
    }
}

pub fn job(id: &str, title: &str, company: Option<&str>) -> Job {
    Job {
        id: id.to_string(),
        title: title.to_string(),
        job_type: "Full Time".to_string(),
        company: company.map(|name| {
            Ref::Populated(Box::new(Company {
                id: format!("c-{}", name.to_lowercase()),
                name: name.to_string(),
                ..Default::default()
            }))
        }),
        ..Default::default()
    }
}

/// Records every call as `"operation argument"` and answers from its fields.
#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<String, u16>>,
    pub token: Mutex<Option<String>>,
    pub user: Mutex<Option<User>>,
    pub jobs: Mutex<Vec<Job>>,
    pub companies: Mutex<Vec<Company>>,
    pub applied: Mutex<Vec<Application>>,
    pub stats: Mutex<DashboardStats>,
    pub last_profile_update: Mutex<Option<ProfileUpdate>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jobs(jobs: Vec<Job>) -> Self {
        let backend = Self::new();
        *backend.jobs.lock().unwrap() = jobs;
        backend
    }

    /// Makes `operation` fail with `status`; 200 means a `success: false` envelope.
    pub fn fail(&self, operation: &str, status: u16) {
        self.failures.lock().unwrap().insert(operation.to_string(), status);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, operation: &str, argument: &str) -> Result<(), ClientError> {
        let entry = format!("{} {}", operation, argument);
        self.calls.lock().unwrap().push(entry.trim().to_string());
        match self.failures.lock().unwrap().get(operation) {
            None => Ok(()),
            Some(200) => Err(ClientError::Backend("Fake failure".to_string())),
            Some(status) => Err(ClientError::from_status(*status, r#"{"message":"Fake failure"}"#)),
        }
    }

    fn find_job(&self, id: &str) -> Result<Job, ClientError> {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .find(|job| job.id == id)
            .cloned()
            .ok_or_else(|| ClientError::from_status(404, r#"{"message":"Job not found"}"#))
    }

    fn reply<T>(data: T, message: &str) -> Result<Reply<T>, ClientError> {
        Ok(Reply {
            data,
            message: message.to_string(),
        })
    }
}

impl Backend for FakeBackend {
    fn set_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }

    fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        self.record("login", &request.email)?;
        let user = self.user.lock().unwrap().clone().unwrap_or_else(|| User {
            email: request.email.clone(),
            ..user(request.role)
        });
        Ok(LoginResponse {
            message: Some(format!("Welcome back {}", user.fullname)),
            user,
            access_token: "access-123".to_string(),
            refresh_token: "refresh-456".to_string(),
        })
    }

    fn register(&self, request: &SignupRequest) -> Result<Reply<()>, ClientError> {
        self.record("register", &request.email)?;
        Self::reply((), "Account created successfully")
    }

    fn logout(&self) -> Result<Reply<()>, ClientError> {
        self.record("logout", "")?;
        Self::reply((), "Logged out successfully")
    }

    fn update_profile(&self, update: &ProfileUpdate) -> Result<Reply<User>, ClientError> {
        let file = update.resume.as_ref().map(|f| f.file_name.as_str()).unwrap_or("");
        self.record("update_profile", file)?;
        *self.last_profile_update.lock().unwrap() = Some(update.clone());

        let form = &update.form;
        let mut user = self.user.lock().unwrap().clone().unwrap_or_else(|| user(Role::Student));
        user.fullname = form.fullname.clone();
        user.email = form.email.clone();
        user.phone_number = form.phone_number.clone();
        user.profile.bio = form.bio.clone();
        user.profile.skills = form.skills.clone();
        user.profile.education = form.education.clone();
        user.profile.experience = form.experience.clone();
        user.profile.languages = form.languages.clone();
        user.profile.certifications = form.certifications.clone();
        if let Some(resume) = &update.resume {
            user.profile.resume = Some(format!("https://files.test/{}", resume.file_name));
            user.profile.resume_original_name = Some(resume.file_name.clone());
        }
        Self::reply(user, "Profile updated successfully")
    }

    fn jobs(&self, keyword: &str) -> Result<Vec<Job>, ClientError> {
        self.record("jobs", keyword)?;
        let keyword = keyword.to_lowercase();
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|job| keyword.is_empty() || job.title.to_lowercase().contains(&keyword))
            .cloned()
            .collect())
    }

    fn job(&self, id: &str) -> Result<Job, ClientError> {
        self.record("job", id)?;
        self.find_job(id)
    }

    fn admin_jobs(&self) -> Result<Vec<Job>, ClientError> {
        self.record("admin_jobs", "")?;
        Ok(self.jobs.lock().unwrap().clone())
    }

    fn post_job(&self, job: &NewJob) -> Result<Reply<Job>, ClientError> {
        self.record("post_job", &job.title)?;
        let posted = Job {
            id: "new-job".to_string(),
            title: job.title.clone(),
            description: job.description.clone(),
            salary: job.salary,
            position: job.position,
            company: Some(Ref::Id(job.company_id.clone())),
            ..Default::default()
        };
        self.jobs.lock().unwrap().push(posted.clone());
        Self::reply(posted, "New job created successfully")
    }

    fn companies(&self) -> Result<Vec<Company>, ClientError> {
        self.record("companies", "")?;
        Ok(self.companies.lock().unwrap().clone())
    }

    fn company(&self, id: &str) -> Result<Company, ClientError> {
        self.record("company", id)?;
        self.companies
            .lock()
            .unwrap()
            .iter()
            .find(|company| company.id == id)
            .cloned()
            .ok_or_else(|| ClientError::from_status(404, r#"{"message":"Company not found"}"#))
    }

    fn register_company(&self, name: &str) -> Result<Reply<Company>, ClientError> {
        self.record("register_company", name)?;
        let company = Company {
            id: "c-new".to_string(),
            name: name.to_string(),
            ..Default::default()
        };
        self.companies.lock().unwrap().push(company.clone());
        Self::reply(company, "Company registered successfully")
    }

    fn update_company(&self, id: &str, update: &CompanyUpdate) -> Result<Reply<Company>, ClientError> {
        self.record("update_company", id)?;
        let company = Company {
            id: id.to_string(),
            name: update.name.clone(),
            description: Some(update.description.clone()),
            website: Some(update.website.clone()),
            location: Some(update.location.clone()),
            ..Default::default()
        };
        Self::reply(company, "Company information updated")
    }

    fn apply(&self, job_id: &str) -> Result<Reply<()>, ClientError> {
        self.record("apply", job_id)?;
        Self::reply((), "Job applied successfully")
    }

    fn applied_jobs(&self) -> Result<Vec<Application>, ClientError> {
        self.record("applied_jobs", "")?;
        Ok(self.applied.lock().unwrap().clone())
    }

    fn applicants(&self, job_id: &str) -> Result<Job, ClientError> {
        self.record("applicants", job_id)?;
        self.find_job(job_id)
    }

    fn update_status(&self, application_id: &str, status: ApplicationStatus) -> Result<Reply<()>, ClientError> {
        self.record("update_status", &format!("{} {}", application_id, status))?;
        Self::reply((), "Status updated successfully")
    }

    fn dashboard_stats(&self) -> Result<DashboardStats, ClientError> {
        self.record("dashboard_stats", "")?;
        Ok(self.stats.lock().unwrap().clone())
    }
}

pub struct FakeParser {
    pub parsed: ParsedResume,
    pub fail: bool,
    pub calls: Mutex<usize>,
}

impl FakeParser {
    pub fn new(parsed: ParsedResume) -> Self {
        Self {
            parsed,
            fail: false,
            calls: Mutex::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(ParsedResume::default())
        }
    }
}

impl ResumeParser for FakeParser {
    fn parse(&self, _file: &UploadFile) -> Result<ParsedResume, ClientError> {
        *self.calls.lock().unwrap() += 1;
        if self.fail {
            return Err(ClientError::Backend("Could not read resume".to_string()));
        }
        Ok(self.parsed.clone())
    }
}

/// Owns one of each collaborator; the store stays with the test so it can be
/// borrowed mutably next to `services()`.
pub struct Harness {
    pub backend: FakeBackend,
    pub db: Database,
    pub notifier: RecordingNotifier,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_backend(FakeBackend::new())
    }

    pub fn with_backend(backend: FakeBackend) -> Self {
        Self {
            backend,
            db: Database::open_in_memory().unwrap(),
            notifier: RecordingNotifier::new(),
        }
    }

    pub fn services(&self) -> Services<'_> {
        Services::new(&self.backend, &self.db, &self.notifier)
    }
}
