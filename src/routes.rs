use std::fmt;

use crate::models::User;

/// Every screen the client can show, addressed by the same paths the web UI uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Signup,
    Jobs,
    Browse,
    Description(String),
    Profile,
    AdminCompanies,
    AdminCompanyCreate,
    AdminCompany(String),
    AdminJobs,
    AdminJobCreate,
    AdminApplicants(String),
    AdminDashboard,
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["signup"] => Route::Signup,
            ["jobs"] => Route::Jobs,
            ["browse"] => Route::Browse,
            ["description", id] => Route::Description(id.to_string()),
            ["profile"] => Route::Profile,
            ["admin", "companies"] => Route::AdminCompanies,
            ["admin", "companies", "create"] => Route::AdminCompanyCreate,
            ["admin", "companies", id] => Route::AdminCompany(id.to_string()),
            ["admin", "jobs"] => Route::AdminJobs,
            ["admin", "jobs", "create"] => Route::AdminJobCreate,
            ["admin", "jobs", id, "applicants"] => Route::AdminApplicants(id.to_string()),
            ["admin", "dashboard"] => Route::AdminDashboard,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Signup => "/signup".to_string(),
            Route::Jobs => "/jobs".to_string(),
            Route::Browse => "/browse".to_string(),
            Route::Description(id) => format!("/description/{}", id),
            Route::Profile => "/profile".to_string(),
            Route::AdminCompanies => "/admin/companies".to_string(),
            Route::AdminCompanyCreate => "/admin/companies/create".to_string(),
            Route::AdminCompany(id) => format!("/admin/companies/{}", id),
            Route::AdminJobs => "/admin/jobs".to_string(),
            Route::AdminJobCreate => "/admin/jobs/create".to_string(),
            Route::AdminApplicants(id) => format!("/admin/jobs/{}/applicants", id),
            Route::AdminDashboard => "/admin/dashboard".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    pub fn is_recruiter_only(&self) -> bool {
        matches!(
            self,
            Route::AdminCompanies
                | Route::AdminCompanyCreate
                | Route::AdminCompany(_)
                | Route::AdminJobs
                | Route::AdminJobCreate
                | Route::AdminApplicants(_)
                | Route::AdminDashboard
        )
    }

    pub fn requires_login(&self) -> bool {
        matches!(self, Route::Profile)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect(Route),
}

/// Decides whether `user` may see `route`. Recruiter screens bounce everyone
/// else to the home page; the profile bounces anonymous visitors to login.
pub fn guard(user: Option<&User>, route: &Route) -> Navigation {
    if route.is_recruiter_only() && !user.is_some_and(User::is_recruiter) {
        return Navigation::Redirect(Route::Home);
    }
    if route.requires_login() && user.is_none() {
        return Navigation::Redirect(Route::Login);
    }
    Navigation::Allow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::testing;

    #[test]
    fn test_parse_and_path_agree() {
        for path in [
            "/",
            "/login",
            "/description/j1",
            "/admin/companies",
            "/admin/companies/create",
            "/admin/companies/c1",
            "/admin/jobs/j1/applicants",
            "/admin/dashboard",
        ] {
            assert_eq!(Route::parse(path).path(), path);
        }
        assert_eq!(Route::parse("/admin/companies/"), Route::AdminCompanies);
        assert!(matches!(Route::parse("/nope/x"), Route::NotFound(_)));
    }

    #[test]
    fn test_admin_routes_redirect_non_recruiters() {
        let route = Route::parse("/admin/companies");
        let student = testing::user(Role::Student);
        let recruiter = testing::user(Role::Recruiter);

        assert_eq!(guard(None, &route), Navigation::Redirect(Route::Home));
        assert_eq!(guard(Some(&student), &route), Navigation::Redirect(Route::Home));
        assert_eq!(guard(Some(&recruiter), &route), Navigation::Allow);
    }

    #[test]
    fn test_profile_requires_login() {
        let student = testing::user(Role::Student);
        assert_eq!(guard(None, &Route::Profile), Navigation::Redirect(Route::Login));
        assert_eq!(guard(Some(&student), &Route::Profile), Navigation::Allow);
        assert_eq!(guard(None, &Route::Jobs), Navigation::Allow);
    }
}
