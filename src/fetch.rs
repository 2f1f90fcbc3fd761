//! Fetch hooks: one authenticated GET each, landed in the store through a ticket.
//!
//! List hooks keep what the store already has when a request fails; hooks for
//! a single entity clear their slot so an old entity never shows under a new id.

use crate::context::Services;
use crate::error::ClientError;
use crate::models::{Application, Company, DashboardStats, Job};
use crate::store::{
    Action, ApplicationAction, CompanyAction, DashboardAction, FetchTicket, JobsAction, Resource, ScopeId, Store,
};

/// What a failed fetch does to the slot it would have filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    Keep,
    Reset,
}

impl Resource {
    pub fn on_failure(&self) -> OnFailure {
        match self {
            Resource::SingleJob | Resource::SingleCompany | Resource::Applicants => OnFailure::Reset,
            _ => OnFailure::Keep,
        }
    }

    fn reset_action(&self) -> Option<Action> {
        match self {
            Resource::SingleJob => Some(Action::Jobs(JobsAction::SetSingleJob(None))),
            Resource::SingleCompany => Some(Action::Companies(CompanyAction::SetSingleCompany(None))),
            Resource::Applicants => Some(Action::Applications(ApplicationAction::SetApplicants(None))),
            _ => None,
        }
    }

    fn success_message(&self) -> &'static str {
        match self {
            Resource::Jobs => "Jobs loaded",
            Resource::AdminJobs => "Your jobs loaded",
            Resource::SingleJob => "Job loaded",
            Resource::Companies => "Companies loaded",
            Resource::SingleCompany => "Company loaded",
            Resource::Applicants => "Applicants loaded",
            Resource::AppliedJobs => "Applied jobs loaded",
            Resource::DashboardStats => "Dashboard loaded",
        }
    }
}

/// Lands a finished request. Returns `Ok(true)` when the data reached the
/// store, `Ok(false)` when the ticket had been superseded or its scope closed.
pub fn complete<T>(
    services: &Services,
    store: &mut Store,
    ticket: &FetchTicket,
    result: Result<T, ClientError>,
    into_action: impl FnOnce(T) -> Action,
) -> Result<bool, ClientError> {
    match result {
        Ok(data) => {
            let landed = store.complete_fetch(ticket, into_action(data));
            if landed {
                services.notifier.success(ticket.resource.success_message());
            }
            Ok(landed)
        }
        Err(e) if !store.is_current(ticket) => {
            tracing::debug!(resource = ?ticket.resource, error = %e, "stale fetch failed");
            Ok(false)
        }
        Err(e) => {
            if ticket.resource.on_failure() == OnFailure::Reset {
                if let Some(reset) = ticket.resource.reset_action() {
                    store.dispatch(reset);
                }
            }
            services.report("fetch", Err(e))
        }
    }
}

pub fn complete_jobs(
    services: &Services,
    store: &mut Store,
    ticket: &FetchTicket,
    result: Result<Vec<Job>, ClientError>,
) -> Result<bool, ClientError> {
    complete(services, store, ticket, result, |jobs| Action::Jobs(JobsAction::SetAllJobs(jobs)))
}

/// Public listing, filtered server-side by the store's current search term.
pub fn fetch_jobs(services: &Services, store: &mut Store, scope: ScopeId) -> Result<bool, ClientError> {
    let ticket = store.begin_fetch(scope, Resource::Jobs);
    let keyword = store.state().jobs.searched_query.clone();
    tracing::debug!(%keyword, "fetching jobs");
    let result = services.backend.jobs(&keyword);
    complete_jobs(services, store, &ticket, result)
}

/// Changes the search term and re-runs the jobs fetch, as the listing does.
pub fn search_jobs(
    services: &Services,
    store: &mut Store,
    scope: ScopeId,
    query: &str,
) -> Result<bool, ClientError> {
    store.dispatch(Action::Jobs(JobsAction::SetSearchedQuery(query.trim().to_string())));
    fetch_jobs(services, store, scope)
}

pub fn fetch_admin_jobs(services: &Services, store: &mut Store, scope: ScopeId) -> Result<bool, ClientError> {
    let ticket = store.begin_fetch(scope, Resource::AdminJobs);
    let result = services.backend.admin_jobs();
    complete(services, store, &ticket, result, |jobs: Vec<Job>| {
        Action::Jobs(JobsAction::SetAllAdminJobs(jobs))
    })
}

pub fn fetch_single_job(
    services: &Services,
    store: &mut Store,
    scope: ScopeId,
    job_id: &str,
) -> Result<bool, ClientError> {
    let ticket = store.begin_fetch(scope, Resource::SingleJob);
    let result = services.backend.job(job_id);
    complete(services, store, &ticket, result, |job: Job| {
        Action::Jobs(JobsAction::SetSingleJob(Some(job)))
    })
}

pub fn fetch_companies(services: &Services, store: &mut Store, scope: ScopeId) -> Result<bool, ClientError> {
    let ticket = store.begin_fetch(scope, Resource::Companies);
    let result = services.backend.companies();
    complete(services, store, &ticket, result, |companies: Vec<Company>| {
        Action::Companies(CompanyAction::SetCompanies(companies))
    })
}

pub fn fetch_single_company(
    services: &Services,
    store: &mut Store,
    scope: ScopeId,
    company_id: &str,
) -> Result<bool, ClientError> {
    let ticket = store.begin_fetch(scope, Resource::SingleCompany);
    let result = services.backend.company(company_id);
    complete(services, store, &ticket, result, |company: Company| {
        Action::Companies(CompanyAction::SetSingleCompany(Some(company)))
    })
}

pub fn fetch_applicants(
    services: &Services,
    store: &mut Store,
    scope: ScopeId,
    job_id: &str,
) -> Result<bool, ClientError> {
    let ticket = store.begin_fetch(scope, Resource::Applicants);
    let result = services.backend.applicants(job_id);
    complete(services, store, &ticket, result, |job: Job| {
        Action::Applications(ApplicationAction::SetApplicants(Some(job)))
    })
}

pub fn fetch_applied_jobs(services: &Services, store: &mut Store, scope: ScopeId) -> Result<bool, ClientError> {
    let ticket = store.begin_fetch(scope, Resource::AppliedJobs);
    let result = services.backend.applied_jobs();
    complete(services, store, &ticket, result, |applications: Vec<Application>| {
        Action::Jobs(JobsAction::SetAllAppliedJobs(applications))
    })
}

pub fn fetch_dashboard_stats(services: &Services, store: &mut Store, scope: ScopeId) -> Result<bool, ClientError> {
    let ticket = store.begin_fetch(scope, Resource::DashboardStats);
    let result = services.backend.dashboard_stats();
    complete(services, store, &ticket, result, |stats: DashboardStats| {
        Action::Dashboard(DashboardAction::SetStats(Some(stats)))
    })
}
