//! Client-side checks that run before any request leaves the machine.

use crate::api::{CompanyUpdate, LoginRequest, NewJob, SignupRequest};
use crate::error::ClientError;
use crate::files::{self, UploadFile};
use crate::models::Role;

pub const MAX_RESUME_BYTES: u64 = 5 * 1024 * 1024;
pub const MAX_IMAGE_BYTES: u64 = 2 * 1024 * 1024;

const RESUME_TYPES: &[&str] = &[files::MIME_PDF, files::MIME_DOC, files::MIME_DOCX];
const IMAGE_TYPES: &[&str] = &[files::MIME_JPEG, files::MIME_PNG, files::MIME_WEBP];

pub fn validate_resume(mime: &str, size: u64) -> Result<(), ClientError> {
    if !RESUME_TYPES.contains(&mime) {
        return Err(ClientError::validation("Please upload a PDF, DOC or DOCX file"));
    }
    if size > MAX_RESUME_BYTES {
        return Err(ClientError::validation("Resume must be 5 MB or smaller"));
    }
    Ok(())
}

pub fn validate_image(file: &UploadFile) -> Result<(), ClientError> {
    if !IMAGE_TYPES.contains(&file.mime.as_str()) {
        return Err(ClientError::validation(format!(
            "'{}' is not a JPEG, PNG or WEBP image",
            file.file_name
        )));
    }
    if file.size() > MAX_IMAGE_BYTES {
        return Err(ClientError::validation("Images must be 2 MB or smaller"));
    }
    Ok(())
}

pub fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.trim().split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
        && !value.contains(char::is_whitespace)
}

pub fn is_phone(value: &str) -> bool {
    let value = value.trim();
    (7..=15).contains(&value.len()) && value.chars().all(|c| c.is_ascii_digit())
}

fn require(value: &str, field: &str) -> Result<String, ClientError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ClientError::validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

fn positive_number(value: &str, field: &str) -> Result<f64, ClientError> {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => Ok(n),
        _ => Err(ClientError::validation(format!("{} must be a positive number", field))),
    }
}

fn positive_integer(value: &str, field: &str) -> Result<u32, ClientError> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ClientError::validation(format!("{} must be a positive whole number", field))),
    }
}

fn non_negative_integer(value: &str, field: &str) -> Result<u32, ClientError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| ClientError::validation(format!("{} must be zero or more", field)))
}

// --- Forms ---

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, ClientError> {
        Ok(LoginRequest {
            email: require(&self.email, "Email")?,
            password: require(&self.password, "Password")?,
            role: self.role.ok_or_else(|| ClientError::validation("Please select a role"))?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub fullname: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub role: Option<Role>,
    pub profile_photo: Option<UploadFile>,
}

impl SignupForm {
    pub fn validate(&self) -> Result<SignupRequest, ClientError> {
        let fullname = require(&self.fullname, "Full name")?;
        let email = require(&self.email, "Email")?;
        if !is_email(&email) {
            return Err(ClientError::validation("Please enter a valid email address"));
        }
        if !is_phone(&self.phone_number) {
            return Err(ClientError::validation("Phone number must be 7 to 15 digits"));
        }
        if self.password.chars().count() < 6 {
            return Err(ClientError::validation("Password must be at least 6 characters"));
        }
        let role = self.role.ok_or_else(|| ClientError::validation("Please select a role"))?;
        if let Some(photo) = &self.profile_photo {
            validate_image(photo)?;
        }
        Ok(SignupRequest {
            fullname,
            email,
            phone_number: self.phone_number.trim().to_string(),
            password: self.password.clone(),
            role,
            profile_photo: self.profile_photo.clone(),
        })
    }
}

/// The post-a-job form, as typed: every numeric field arrives as text.
#[derive(Debug, Clone, Default)]
pub struct JobForm {
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub salary: String,
    pub location: String,
    pub job_type: String,
    pub experience: String,
    pub position: String,
    pub company_id: String,
}

impl JobForm {
    pub fn validate(&self) -> Result<NewJob, ClientError> {
        Ok(NewJob {
            title: require(&self.title, "Title")?,
            description: require(&self.description, "Description")?,
            requirements: self
                .requirements
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .collect::<Vec<_>>()
                .join(","),
            salary: positive_number(&self.salary, "Salary")?,
            location: require(&self.location, "Location")?,
            job_type: require(&self.job_type, "Job type")?,
            experience: non_negative_integer(&self.experience, "Experience level")?,
            position: positive_integer(&self.position, "Number of positions")?,
            company_id: require(&self.company_id, "Company")
                .map_err(|_| ClientError::validation("Please select a company"))?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompanyForm {
    pub name: String,
    pub description: String,
    pub website: String,
    pub location: String,
    pub logo: Option<UploadFile>,
}

impl CompanyForm {
    pub fn validate(&self) -> Result<CompanyUpdate, ClientError> {
        let name = require(&self.name, "Company name")?;
        let website = self.website.trim();
        if !website.is_empty() && !(website.starts_with("http://") || website.starts_with("https://")) {
            return Err(ClientError::validation("Website must start with http:// or https://"));
        }
        if let Some(logo) = &self.logo {
            validate_image(logo)?;
        }
        Ok(CompanyUpdate {
            name,
            description: self.description.trim().to_string(),
            website: website.to_string(),
            location: self.location.trim().to_string(),
            logo: self.logo.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_form() -> JobForm {
        JobForm {
            title: "Rust Developer".into(),
            description: "Build things".into(),
            requirements: "Rust, SQL , ,Linux".into(),
            salary: "12".into(),
            location: "Remote".into(),
            job_type: "Full Time".into(),
            experience: "2".into(),
            position: "3".into(),
            company_id: "c1".into(),
        }
    }

    #[test]
    fn test_resume_validation() {
        assert!(validate_resume(files::MIME_PDF, 6 * 1024 * 1024).is_err());
        let xlsx = files::mime_for_name("sheet.xlsx");
        assert!(validate_resume(xlsx, 1024).is_err());
        assert!(validate_resume(files::MIME_DOCX, 4 * 1024 * 1024).is_ok());
        assert!(validate_resume(files::MIME_DOC, MAX_RESUME_BYTES).is_ok());
        assert!(validate_resume(files::MIME_PDF, MAX_RESUME_BYTES + 1).is_err());
    }

    #[test]
    fn test_image_validation() {
        assert!(validate_image(&UploadFile::new("me.png", vec![0; 10])).is_ok());
        assert!(validate_image(&UploadFile::new("me.pdf", vec![0; 10])).is_err());
        assert!(validate_image(&UploadFile::new("me.jpg", vec![0; 3 * 1024 * 1024])).is_err());
    }

    #[test]
    fn test_is_email() {
        assert!(is_email("user@test.com"));
        assert!(!is_email("user@test"));
        assert!(!is_email("@test.com"));
        assert!(!is_email("user test@test.com"));
        assert!(!is_email("user@@test.com"));
    }

    #[test]
    fn test_job_form_valid() {
        let job = job_form().validate().unwrap();
        assert_eq!(job.salary, 12.0);
        assert_eq!(job.requirements, "Rust,SQL,Linux");
        assert_eq!(job.position, 3);
    }

    #[test]
    fn test_job_form_rejects_negative_salary() {
        let form = JobForm {
            salary: "-5".into(),
            ..job_form()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.to_string(), "Salary must be a positive number");
    }

    #[test]
    fn test_job_form_rejects_bad_counts() {
        let form = JobForm {
            position: "0".into(),
            ..job_form()
        };
        assert!(form.validate().is_err());

        let form = JobForm {
            experience: "-1".into(),
            ..job_form()
        };
        assert!(form.validate().is_err());

        let form = JobForm {
            company_id: " ".into(),
            ..job_form()
        };
        assert_eq!(form.validate().unwrap_err().to_string(), "Please select a company");
    }

    #[test]
    fn test_login_form_requires_role() {
        let form = LoginForm {
            email: "user@test.com".into(),
            password: "secret1".into(),
            role: None,
        };
        assert!(form.validate().is_err());
        let form = LoginForm {
            role: Some(Role::Student),
            ..form
        };
        assert_eq!(form.validate().unwrap().role, Role::Student);
    }

    #[test]
    fn test_signup_form() {
        let form = SignupForm {
            fullname: "Test User".into(),
            email: "user@test.com".into(),
            phone_number: "5551234567".into(),
            password: "secret1".into(),
            role: Some(Role::Recruiter),
            profile_photo: None,
        };
        assert!(form.validate().is_ok());

        let short = SignupForm {
            password: "abc".into(),
            ..form.clone()
        };
        assert!(short.validate().is_err());

        let bad_phone = SignupForm {
            phone_number: "555-1234".into(),
            ..form
        };
        assert!(bad_phone.validate().is_err());
    }

    #[test]
    fn test_company_form_website() {
        let form = CompanyForm {
            name: "Acme".into(),
            website: "acme.com".into(),
            ..Default::default()
        };
        assert!(form.validate().is_err());

        let form = CompanyForm {
            website: "https://acme.com".into(),
            ..form
        };
        assert_eq!(form.validate().unwrap().website, "https://acme.com");
    }
}
