use regex::{Regex, RegexBuilder};

use crate::error::ClientError;
use crate::models::{Company, Job};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// The query is matched as plain text; `C++` means the three characters `C++`.
    #[default]
    Literal,
    /// The query is a regular expression. Opt-in only.
    Regex,
}

/// A compiled, case-insensitive search term.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pattern: Option<Regex>,
}

impl SearchQuery {
    pub fn new(query: &str, mode: SearchMode) -> Result<Self, ClientError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Self { pattern: None });
        }

        let source = match mode {
            SearchMode::Literal => regex::escape(query),
            SearchMode::Regex => query.to_string(),
        };
        let pattern = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|e| ClientError::validation(format!("Invalid search pattern '{}': {}", query, e)))?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Literal queries cannot fail to compile.
    pub fn literal(query: &str) -> Self {
        Self::new(query, SearchMode::Literal).unwrap_or(Self { pattern: None })
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }

    pub fn matches(&self, text: &str) -> bool {
        match &self.pattern {
            None => true,
            Some(re) => re.is_match(text),
        }
    }
}

/// Public listing: title, company name or job type.
pub fn filter_jobs<'a>(jobs: &'a [Job], query: &SearchQuery) -> Vec<&'a Job> {
    jobs.iter()
        .filter(|job| {
            query.matches(&job.title) || query.matches(job.company_name()) || query.matches(&job.job_type)
        })
        .collect()
}

/// Recruiter's jobs table: title or company name.
pub fn filter_admin_jobs<'a>(jobs: &'a [Job], query: &SearchQuery) -> Vec<&'a Job> {
    jobs.iter()
        .filter(|job| query.matches(&job.title) || query.matches(job.company_name()))
        .collect()
}

pub fn filter_companies<'a>(companies: &'a [Company], query: &SearchQuery) -> Vec<&'a Company> {
    companies.iter().filter(|company| query.matches(&company.name)).collect()
}
