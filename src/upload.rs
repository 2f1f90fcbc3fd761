//! Resume upload: pick a file, check it, optionally parse it, fold the parse
//! into the profile form and submit both as one profile update.

use crate::api::ResumeParser;
use crate::context::Services;
use crate::error::ClientError;
use crate::files::UploadFile;
use crate::profile::{ProfileForm, ProfileUpdate};
use crate::resume::{merge_into_form, ParsedResume};
use crate::store::{Action, AuthAction, Store};
use crate::validate;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum UploadState {
    #[default]
    Idle,
    Validating(UploadFile),
    Parsing(UploadFile),
    Mapping {
        file: UploadFile,
        parsed: ParsedResume,
    },
    Submitting {
        file: UploadFile,
        form: ProfileForm,
    },
}

impl UploadState {
    pub fn is_busy(&self) -> bool {
        !matches!(self, UploadState::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            UploadState::Idle => "idle",
            UploadState::Validating(_) => "validating",
            UploadState::Parsing(_) => "parsing",
            UploadState::Mapping { .. } => "mapping",
            UploadState::Submitting { .. } => "submitting",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    FileSelected(UploadFile),
    /// `parse` is false when no parser is configured; mapping then starts from an empty parse.
    Validated { parse: bool },
    Parsed(ParsedResume),
    Mapped(ProfileForm),
    Submitted,
    Failed,
}

/// The single place the pipeline changes state. Events that make no sense in
/// the current state leave it untouched.
pub fn transition(state: UploadState, event: UploadEvent) -> UploadState {
    match (state, event) {
        (UploadState::Idle, UploadEvent::FileSelected(file)) => UploadState::Validating(file),
        (UploadState::Validating(file), UploadEvent::Validated { parse: true }) => UploadState::Parsing(file),
        (UploadState::Validating(file), UploadEvent::Validated { parse: false }) => UploadState::Mapping {
            file,
            parsed: ParsedResume::default(),
        },
        (UploadState::Parsing(file), UploadEvent::Parsed(parsed)) => UploadState::Mapping { file, parsed },
        (UploadState::Mapping { file, .. }, UploadEvent::Mapped(form)) => UploadState::Submitting { file, form },
        (UploadState::Submitting { .. }, UploadEvent::Submitted) => UploadState::Idle,
        (_, UploadEvent::Failed) => UploadState::Idle,
        (state, event) => {
            tracing::debug!(state = state.name(), ?event, "ignoring upload event");
            state
        }
    }
}

/// Drives one resume through the pipeline, one stage per `advance`.
pub struct ResumeUploader<'a> {
    state: UploadState,
    parser: Option<&'a dyn ResumeParser>,
}

impl<'a> ResumeUploader<'a> {
    pub fn new(parser: Option<&'a dyn ResumeParser>) -> Self {
        Self {
            state: UploadState::Idle,
            parser,
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    fn apply(&mut self, event: UploadEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = transition(state, event);
    }

    /// Starts the pipeline. Rejected while an earlier file is still in flight.
    pub fn select(&mut self, services: &Services, file: UploadFile) -> Result<(), ClientError> {
        if self.state.is_busy() {
            return services.report("upload resume", Err(ClientError::Busy));
        }
        tracing::info!(file = %file.file_name, bytes = file.size(), "resume selected");
        self.apply(UploadEvent::FileSelected(file));
        Ok(())
    }

    /// Runs the current stage. Any failure notifies, returns the pipeline to
    /// idle and comes back as the error.
    pub fn advance(&mut self, services: &Services, store: &mut Store) -> Result<(), ClientError> {
        let outcome = self.step(services, store);
        if outcome.is_err() {
            self.apply(UploadEvent::Failed);
        }
        outcome
    }

    /// Advances until the pipeline is idle again.
    pub fn run(&mut self, services: &Services, store: &mut Store) -> Result<(), ClientError> {
        while self.state.is_busy() {
            self.advance(services, store)?;
        }
        Ok(())
    }

    fn step(&mut self, services: &Services, store: &mut Store) -> Result<(), ClientError> {
        match &self.state {
            UploadState::Idle => Ok(()),
            UploadState::Validating(file) => {
                let checked = validate::validate_resume(&file.mime, file.size());
                services.report("validate resume", checked)?;
                let parse = self.parser.is_some();
                self.apply(UploadEvent::Validated { parse });
                Ok(())
            }
            UploadState::Parsing(file) => {
                let Some(parser) = self.parser else {
                    self.apply(UploadEvent::Parsed(ParsedResume::default()));
                    return Ok(());
                };
                let parsed = services.report("parse resume", parser.parse(file))?;
                tracing::debug!(
                    education = parsed.education.len(),
                    experience = parsed.experience.len(),
                    "resume parsed"
                );
                self.apply(UploadEvent::Parsed(parsed));
                Ok(())
            }
            UploadState::Mapping { parsed, .. } => {
                let user = store
                    .user()
                    .ok_or_else(|| ClientError::validation("Please log in to upload a resume"));
                let user = services.report("map resume", user)?;
                let form = merge_into_form(&ProfileForm::from_user(user), parsed);
                self.apply(UploadEvent::Mapped(form));
                Ok(())
            }
            UploadState::Submitting { file, form } => {
                let mut update = ProfileUpdate::new(form.clone());
                update.resume = Some(file.clone());
                services.report("submit profile", update.validate())?;

                let reply = services
                    .backend
                    .update_profile(&update)
                    .map_err(|e| match e {
                        ClientError::PayloadTooLarge => {
                            ClientError::Backend("Resume is too large for the server to accept".to_string())
                        }
                        ClientError::UnsupportedMedia => ClientError::Backend(
                            "The server does not accept this resume format; upload a PDF, DOC or DOCX".to_string(),
                        ),
                        other => other,
                    });
                let reply = services.report("submit profile", reply)?;

                store.dispatch(Action::Auth(AuthAction::SetUser(Some(reply.data))));
                services.report("save session", services.persist(store))?;
                services.notifier.success(&reply.message);
                self.apply(UploadEvent::Submitted);
                Ok(())
            }
        }
    }
}
