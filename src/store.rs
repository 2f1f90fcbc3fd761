//! Typed client state: one struct per slice, one reducer per slice, and a
//! `Store` that owns them and decides whether fetched data may still land.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::models::{Application, ApplicationStatus, Company, DashboardStats, Job, Ref, User};

// --- Slices ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthState {
    pub user: Option<User>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobsState {
    pub all_jobs: Vec<Job>,
    pub all_admin_jobs: Vec<Job>,
    pub single_job: Option<Job>,
    /// Filter text for the recruiter's own jobs table.
    pub search_job_by_text: String,
    pub all_applied_jobs: Vec<Application>,
    /// Search term for the public job listing; changing it re-runs the jobs fetch.
    pub searched_query: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyState {
    pub single_company: Option<Company>,
    pub companies: Vec<Company>,
    pub search_company_by_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationState {
    /// The job whose applications are being reviewed, applicants populated.
    pub applicants: Option<Job>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    pub stats: Option<DashboardStats>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub auth: AuthState,
    pub jobs: JobsState,
    pub companies: CompanyState,
    pub applications: ApplicationState,
    pub dashboard: DashboardState,
}

// --- Actions ---

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    SetUser(Option<User>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobsAction {
    SetAllJobs(Vec<Job>),
    SetAllAdminJobs(Vec<Job>),
    SetSingleJob(Option<Job>),
    SetSearchJobByText(String),
    SetAllAppliedJobs(Vec<Application>),
    SetSearchedQuery(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompanyAction {
    SetSingleCompany(Option<Company>),
    SetCompanies(Vec<Company>),
    SetSearchCompanyByText(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApplicationAction {
    SetApplicants(Option<Job>),
    SetStatus {
        application_id: String,
        status: ApplicationStatus,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardAction {
    SetStats(Option<DashboardStats>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Auth(AuthAction),
    Jobs(JobsAction),
    Companies(CompanyAction),
    Applications(ApplicationAction),
    Dashboard(DashboardAction),
    /// Drops every slice back to its empty shape (logout).
    Reset,
}

// --- Reducers ---

impl AuthState {
    fn reduce(&mut self, action: AuthAction) {
        match action {
            AuthAction::SetUser(user) => self.user = user,
        }
    }
}

impl JobsState {
    fn reduce(&mut self, action: JobsAction) {
        match action {
            JobsAction::SetAllJobs(jobs) => self.all_jobs = jobs,
            JobsAction::SetAllAdminJobs(jobs) => self.all_admin_jobs = jobs,
            JobsAction::SetSingleJob(job) => self.single_job = job,
            JobsAction::SetSearchJobByText(text) => self.search_job_by_text = text,
            JobsAction::SetAllAppliedJobs(applications) => self.all_applied_jobs = applications,
            JobsAction::SetSearchedQuery(query) => self.searched_query = query,
        }
    }
}

impl CompanyState {
    fn reduce(&mut self, action: CompanyAction) {
        match action {
            CompanyAction::SetSingleCompany(company) => self.single_company = company,
            CompanyAction::SetCompanies(companies) => self.companies = companies,
            CompanyAction::SetSearchCompanyByText(text) => self.search_company_by_text = text,
        }
    }
}

impl ApplicationState {
    fn reduce(&mut self, action: ApplicationAction) {
        match action {
            ApplicationAction::SetApplicants(job) => self.applicants = job,
            ApplicationAction::SetStatus {
                application_id,
                status,
            } => {
                let Some(job) = self.applicants.as_mut() else { return };
                for application in job.applications.iter_mut() {
                    if let Ref::Populated(app) = application {
                        if app.id == application_id {
                            app.status = status;
                        }
                    }
                }
            }
        }
    }
}

impl DashboardState {
    fn reduce(&mut self, action: DashboardAction) {
        match action {
            DashboardAction::SetStats(stats) => self.stats = stats,
        }
    }
}

impl AppState {
    pub fn reduce(&mut self, action: Action) {
        match action {
            Action::Auth(a) => self.auth.reduce(a),
            Action::Jobs(a) => self.jobs.reduce(a),
            Action::Companies(a) => self.companies.reduce(a),
            Action::Applications(a) => self.applications.reduce(a),
            Action::Dashboard(a) => self.dashboard.reduce(a),
            Action::Reset => *self = AppState::default(),
        }
    }
}

// --- Persistence boundary ---

/// The slices that survive a restart. Only the session is whitelisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub auth: Option<AuthState>,
}

// --- Fetch tickets ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Jobs,
    AdminJobs,
    SingleJob,
    Companies,
    SingleCompany,
    Applicants,
    AppliedJobs,
    DashboardStats,
}

/// Identifies the screen a fetch was started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub resource: Resource,
    generation: u64,
    scope: ScopeId,
}

#[derive(Debug, Default)]
pub struct Store {
    state: AppState,
    generations: HashMap<Resource, u64>,
    open_scopes: HashSet<ScopeId>,
    next_scope: u64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rehydrate(persisted: PersistedState) -> Self {
        let mut store = Self::new();
        if let Some(auth) = persisted.auth {
            store.state.auth = auth;
        }
        store
    }

    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            auth: Some(self.state.auth.clone()),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.state.auth.user.as_ref()
    }

    pub fn dispatch(&mut self, action: Action) {
        tracing::trace!(?action, "dispatch");
        self.state.reduce(action);
    }

    pub fn open_scope(&mut self) -> ScopeId {
        self.next_scope += 1;
        let scope = ScopeId(self.next_scope);
        self.open_scopes.insert(scope);
        scope
    }

    /// Ends a screen's lifetime; any fetch it started can no longer land.
    pub fn close_scope(&mut self, scope: ScopeId) {
        self.open_scopes.remove(&scope);
    }

    /// Starts a fetch, superseding every earlier ticket for the same resource.
    pub fn begin_fetch(&mut self, scope: ScopeId, resource: Resource) -> FetchTicket {
        let generation = self.generations.entry(resource).or_insert(0);
        *generation += 1;
        FetchTicket {
            resource,
            generation: *generation,
            scope,
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.open_scopes.contains(&ticket.scope)
            && self.generations.get(&ticket.resource) == Some(&ticket.generation)
    }

    /// Applies `action` only if `ticket` is still current. Returns whether it landed.
    pub fn complete_fetch(&mut self, ticket: &FetchTicket, action: Action) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(resource = ?ticket.resource, "discarding stale fetch result");
            return false;
        }
        self.dispatch(action);
        true
    }
}
