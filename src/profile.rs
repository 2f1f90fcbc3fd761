use crate::error::ClientError;
use crate::files::UploadFile;
use crate::models::{Certification, Education, Experience, Language, SocialLinks, User};
use crate::validate::{self, is_email, is_phone};

/// The editable field set of the profile dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub fullname: String,
    pub email: String,
    pub phone_number: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub languages: Vec<Language>,
    pub certifications: Vec<Certification>,
    pub social_links: SocialLinks,
    pub interests: Vec<String>,
    pub preferred_job_types: Vec<String>,
    pub expected_salary: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Section {
    Education,
    Experience,
    Language,
    Certification,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        let profile = &user.profile;
        Self {
            fullname: user.fullname.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            bio: profile.bio.clone(),
            skills: profile.skills.clone(),
            education: profile.education.clone(),
            experience: profile.experience.clone(),
            languages: profile.languages.clone(),
            certifications: profile.certifications.clone(),
            social_links: profile.social_links.clone(),
            interests: profile.interests.clone(),
            preferred_job_types: profile.preferred_job_types.clone(),
            expected_salary: profile.expected_salary,
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.fullname.trim().is_empty() {
            return Err(ClientError::validation("Full name is required"));
        }
        if !is_email(&self.email) {
            return Err(ClientError::validation("Please enter a valid email address"));
        }
        if !self.phone_number.trim().is_empty() && !is_phone(&self.phone_number) {
            return Err(ClientError::validation("Phone number must be 7 to 15 digits"));
        }
        if self.expected_salary.is_some_and(|salary| !salary.is_finite() || salary < 0.0) {
            return Err(ClientError::validation("Expected salary cannot be negative"));
        }
        Ok(())
    }

    pub fn len_of(&self, section: Section) -> usize {
        match section {
            Section::Education => self.education.len(),
            Section::Experience => self.experience.len(),
            Section::Language => self.languages.len(),
            Section::Certification => self.certifications.len(),
        }
    }

    /// Removes the entry at `index`. Later entries shift down by one.
    pub fn remove_entry(&mut self, section: Section, index: usize) -> Result<(), ClientError> {
        let len = self.len_of(section);
        if index >= len {
            return Err(ClientError::validation(format!(
                "No {:?} entry at position {} (there are {})",
                section, index, len
            )));
        }
        match section {
            Section::Education => {
                self.education.remove(index);
            }
            Section::Experience => {
                self.experience.remove(index);
            }
            Section::Language => {
                self.languages.remove(index);
            }
            Section::Certification => {
                self.certifications.remove(index);
            }
        }
        Ok(())
    }

    pub fn update_education(&mut self, index: usize, entry: Education) -> Result<(), ClientError> {
        replace_at(&mut self.education, index, entry, "education")
    }

    pub fn update_experience(&mut self, index: usize, entry: Experience) -> Result<(), ClientError> {
        replace_at(&mut self.experience, index, entry, "experience")
    }
}

fn replace_at<T>(items: &mut [T], index: usize, item: T, what: &str) -> Result<(), ClientError> {
    match items.get_mut(index) {
        Some(slot) => {
            *slot = item;
            Ok(())
        }
        None => Err(ClientError::validation(format!(
            "No {} entry at position {}",
            what, index
        ))),
    }
}

/// One multipart profile update: the form plus any files picked alongside it.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub form: ProfileForm,
    pub resume: Option<UploadFile>,
    pub profile_photo: Option<UploadFile>,
    pub cover_image: Option<UploadFile>,
}

impl ProfileUpdate {
    pub fn new(form: ProfileForm) -> Self {
        Self {
            form,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        self.form.validate()?;
        if let Some(resume) = &self.resume {
            validate::validate_resume(&resume.mime, resume.size())?;
        }
        for image in [&self.profile_photo, &self.cover_image].into_iter().flatten() {
            validate::validate_image(image)?;
        }
        Ok(())
    }

    /// Text parts of the multipart body. List-of-record fields go as JSON strings.
    pub fn text_fields(&self) -> Result<Vec<(&'static str, String)>, ClientError> {
        let form = &self.form;
        let mut fields = vec![
            ("fullname", form.fullname.trim().to_string()),
            ("email", form.email.trim().to_string()),
            ("phoneNumber", form.phone_number.trim().to_string()),
            ("bio", form.bio.clone()),
            ("skills", form.skills.join(",")),
            ("education", serde_json::to_string(&form.education)?),
            ("experience", serde_json::to_string(&form.experience)?),
            ("languages", serde_json::to_string(&form.languages)?),
            ("certifications", serde_json::to_string(&form.certifications)?),
            ("socialLinks", serde_json::to_string(&form.social_links)?),
            ("interests", form.interests.join(",")),
            ("preferredJobTypes", form.preferred_job_types.join(",")),
        ];
        if let Some(salary) = form.expected_salary {
            fields.push(("expectedSalary", salary.to_string()));
        }
        Ok(fields)
    }
}

/// Splits a comma-separated input into trimmed, non-empty items.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
