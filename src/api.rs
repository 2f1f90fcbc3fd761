use reqwest::blocking::{multipart, Client, RequestBuilder};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::RwLock;

use crate::error::{backend_message, ClientError};
use crate::files::UploadFile;
use crate::models::{Application, ApplicationStatus, Company, DashboardStats, Job, Role, User};
use crate::profile::ProfileUpdate;
use crate::resume::ParsedResume;

// --- Requests and replies ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignupRequest {
    pub fullname: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub role: Role,
    pub profile_photo: Option<UploadFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub description: String,
    /// Comma-joined, the way the backend splits it.
    pub requirements: String,
    pub salary: f64,
    pub location: String,
    pub job_type: String,
    pub experience: u32,
    pub position: u32,
    pub company_id: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompanyUpdate {
    pub name: String,
    pub description: String,
    pub website: String,
    pub location: String,
    pub logo: Option<UploadFile>,
}

/// A mutation's payload together with the backend's human-readable message.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    pub data: T,
    pub message: String,
}

// --- Collaborator seams ---

/// The job board REST backend. Every call is one request; nothing is retried.
pub trait Backend: Send + Sync {
    fn set_token(&self, token: Option<String>);

    fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError>;
    fn register(&self, request: &SignupRequest) -> Result<Reply<()>, ClientError>;
    fn logout(&self) -> Result<Reply<()>, ClientError>;
    fn update_profile(&self, update: &ProfileUpdate) -> Result<Reply<User>, ClientError>;

    fn jobs(&self, keyword: &str) -> Result<Vec<Job>, ClientError>;
    fn job(&self, id: &str) -> Result<Job, ClientError>;
    fn admin_jobs(&self) -> Result<Vec<Job>, ClientError>;
    fn post_job(&self, job: &NewJob) -> Result<Reply<Job>, ClientError>;

    fn companies(&self) -> Result<Vec<Company>, ClientError>;
    fn company(&self, id: &str) -> Result<Company, ClientError>;
    fn register_company(&self, name: &str) -> Result<Reply<Company>, ClientError>;
    fn update_company(&self, id: &str, update: &CompanyUpdate) -> Result<Reply<Company>, ClientError>;

    fn apply(&self, job_id: &str) -> Result<Reply<()>, ClientError>;
    fn applied_jobs(&self) -> Result<Vec<Application>, ClientError>;
    fn applicants(&self, job_id: &str) -> Result<Job, ClientError>;
    fn update_status(&self, application_id: &str, status: ApplicationStatus) -> Result<Reply<()>, ClientError>;

    fn dashboard_stats(&self) -> Result<DashboardStats, ClientError>;
}

/// The third-party resume parsing service.
pub trait ResumeParser {
    fn parse(&self, file: &UploadFile) -> Result<ParsedResume, ClientError>;
}

// --- HTTP implementation ---

pub struct HttpBackend {
    base_url: String,
    client: Client,
    token: RwLock<Option<String>>,
}

impl HttpBackend {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
            token: RwLock::new(token),
        }
    }

    /// Appends `segments` to the base URL. Each segment is percent-encoded, so
    /// an id containing `/`, `?` or `#` stays inside its own segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let invalid = || ClientError::validation(format!("Invalid API URL '{}'", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.token.read().ok().and_then(|guard| guard.clone());
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn send(&self, request: RequestBuilder) -> Result<Value, ClientError> {
        let request = self.authed(request);
        let response = request.send().map_err(ClientError::Network)?;
        let status = response.status();
        let body = response.text().map_err(ClientError::Network)?;
        tracing::debug!(status = status.as_u16(), bytes = body.len(), "backend response");
        decode_envelope(status.as_u16(), &body)
    }

    fn get<T: DeserializeOwned>(&self, segments: &[&str], key: &str) -> Result<T, ClientError> {
        let body = self.send(self.client.get(self.endpoint(segments)?))?;
        take(body, key)
    }

    fn file_part(file: &UploadFile) -> Result<multipart::Part, ClientError> {
        multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime)
            .map_err(|_| ClientError::validation(format!("Invalid file type '{}'", file.mime)))
    }
}

/// Turns an HTTP status and body into the `{success, message, ...}` envelope,
/// failing on non-2xx statuses and on `success: false`.
pub fn decode_envelope(status: u16, body: &str) -> Result<Value, ClientError> {
    if !(200..300).contains(&status) {
        return Err(ClientError::from_status(status, body));
    }
    let value: Value = serde_json::from_str(body)?;
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(ClientError::Backend(
            backend_message(body).unwrap_or_else(|| "Request failed".to_string()),
        ));
    }
    Ok(value)
}

fn take<T: DeserializeOwned>(mut body: Value, key: &str) -> Result<T, ClientError> {
    let payload = body
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| ClientError::Decode(format!("missing '{}' in response", key)))?;
    Ok(serde_json::from_value(payload)?)
}

fn message_of(body: &Value, fallback: &str) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(fallback)
        .to_string()
}

impl Backend for HttpBackend {
    fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }

    fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        let body = self.send(self.client.post(self.endpoint(&["user", "login"])?).json(request))?;
        Ok(serde_json::from_value(body)?)
    }

    fn register(&self, request: &SignupRequest) -> Result<Reply<()>, ClientError> {
        let mut form = multipart::Form::new()
            .text("fullname", request.fullname.clone())
            .text("email", request.email.clone())
            .text("phoneNumber", request.phone_number.clone())
            .text("password", request.password.clone())
            .text("role", request.role.to_string());
        if let Some(photo) = &request.profile_photo {
            form = form.part("file", Self::file_part(photo)?);
        }
        let body = self.send(self.client.post(self.endpoint(&["user", "register"])?).multipart(form))?;
        Ok(Reply {
            data: (),
            message: message_of(&body, "Account created"),
        })
    }

    fn logout(&self) -> Result<Reply<()>, ClientError> {
        let body = self.send(self.client.get(self.endpoint(&["user", "logout"])?))?;
        Ok(Reply {
            data: (),
            message: message_of(&body, "Logged out"),
        })
    }

    fn update_profile(&self, update: &ProfileUpdate) -> Result<Reply<User>, ClientError> {
        let mut form = multipart::Form::new();
        for (key, value) in update.text_fields()? {
            form = form.text(key, value);
        }
        if let Some(resume) = &update.resume {
            form = form.part("resume", Self::file_part(resume)?);
        }
        if let Some(photo) = &update.profile_photo {
            form = form.part("profilePhoto", Self::file_part(photo)?);
        }
        if let Some(cover) = &update.cover_image {
            form = form.part("coverImage", Self::file_part(cover)?);
        }
        let body = self.send(self.client.post(self.endpoint(&["user", "profile", "update"])?).multipart(form))?;
        let message = message_of(&body, "Profile updated");
        Ok(Reply {
            data: take(body, "user")?,
            message,
        })
    }

    fn jobs(&self, keyword: &str) -> Result<Vec<Job>, ClientError> {
        let body = self.send(
            self.client
                .get(self.endpoint(&["job", "get"])?)
                .query(&[("keyword", keyword)]),
        )?;
        take(body, "jobs")
    }

    fn job(&self, id: &str) -> Result<Job, ClientError> {
        self.get(&["job", "get", id], "job")
    }

    fn admin_jobs(&self) -> Result<Vec<Job>, ClientError> {
        self.get(&["job", "getadminjobs"], "jobs")
    }

    fn post_job(&self, job: &NewJob) -> Result<Reply<Job>, ClientError> {
        let body = self.send(self.client.post(self.endpoint(&["job", "post"])?).json(job))?;
        let message = message_of(&body, "Job posted");
        Ok(Reply {
            data: take(body, "job")?,
            message,
        })
    }

    fn companies(&self) -> Result<Vec<Company>, ClientError> {
        self.get(&["company", "get"], "companies")
    }

    fn company(&self, id: &str) -> Result<Company, ClientError> {
        self.get(&["company", "get", id], "company")
    }

    fn register_company(&self, name: &str) -> Result<Reply<Company>, ClientError> {
        let payload = serde_json::json!({ "companyName": name });
        let body = self.send(self.client.post(self.endpoint(&["company", "register"])?).json(&payload))?;
        let message = message_of(&body, "Company registered");
        Ok(Reply {
            data: take(body, "company")?,
            message,
        })
    }

    fn update_company(&self, id: &str, update: &CompanyUpdate) -> Result<Reply<Company>, ClientError> {
        let mut form = multipart::Form::new()
            .text("name", update.name.clone())
            .text("description", update.description.clone())
            .text("website", update.website.clone())
            .text("location", update.location.clone());
        if let Some(logo) = &update.logo {
            form = form.part("file", Self::file_part(logo)?);
        }
        let body = self.send(
            self.client
                .put(self.endpoint(&["company", "update", id])?)
                .multipart(form),
        )?;
        let message = message_of(&body, "Company updated");
        Ok(Reply {
            data: take(body, "company")?,
            message,
        })
    }

    fn apply(&self, job_id: &str) -> Result<Reply<()>, ClientError> {
        let body = self.send(self.client.get(self.endpoint(&["application", "apply", job_id])?))?;
        Ok(Reply {
            data: (),
            message: message_of(&body, "Applied successfully"),
        })
    }

    fn applied_jobs(&self) -> Result<Vec<Application>, ClientError> {
        self.get(&["application", "get"], "application")
    }

    fn applicants(&self, job_id: &str) -> Result<Job, ClientError> {
        self.get(&["application", job_id, "applicants"], "job")
    }

    fn update_status(&self, application_id: &str, status: ApplicationStatus) -> Result<Reply<()>, ClientError> {
        let payload = serde_json::json!({ "status": status });
        let body = self.send(
            self.client
                .post(self.endpoint(&["application", "status", application_id, "update"])?)
                .json(&payload),
        )?;
        Ok(Reply {
            data: (),
            message: message_of(&body, "Status updated"),
        })
    }

    fn dashboard_stats(&self) -> Result<DashboardStats, ClientError> {
        self.get(&["dashboard", "stats"], "stats")
    }
}

pub struct HttpResumeParser {
    url: String,
    client: Client,
}

impl HttpResumeParser {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            client: Client::new(),
        }
    }
}

impl ResumeParser for HttpResumeParser {
    fn parse(&self, file: &UploadFile) -> Result<ParsedResume, ClientError> {
        let form = multipart::Form::new().part("file", HttpBackend::file_part(file)?);
        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .map_err(ClientError::Network)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(ClientError::Network)?;
        parse_resume_body(status, &body)
    }
}

/// The parser answers either with the document itself or wrapped in `data`.
pub fn parse_resume_body(status: u16, body: &str) -> Result<ParsedResume, ClientError> {
    let mut value = decode_envelope(status, body)?;
    let document = match value.get_mut("data") {
        Some(data) if data.is_object() => data.take(),
        _ => value,
    };
    Ok(serde_json::from_value(document)?)
}
