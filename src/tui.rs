use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use crate::actions;
use crate::api::Backend;
use crate::context::Services;
use crate::db::Database;
use crate::error::ClientError;
use crate::fetch;
use crate::filter::{filter_jobs, SearchMode, SearchQuery};
use crate::models::Job;
use crate::notify::{Level, Notification, RecordingNotifier};
use crate::store::{Action, FetchTicket, JobsAction, Resource, ScopeId, Store};

type SearchRequest = (FetchTicket, String);
type SearchResult = (FetchTicket, Result<Vec<Job>, ClientError>);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Nothing,
    Quit,
    Search,
    Apply(String),
}

/// Screen state that is not part of the store: cursor, search box, status line.
struct BrowseView {
    selected: usize,
    scroll_offset: u16,
    input: String,
    editing: bool,
    mode: SearchMode,
    status: Option<Notification>,
}

impl BrowseView {
    fn new(query: &str) -> Self {
        Self {
            selected: 0,
            scroll_offset: 0,
            input: query.to_string(),
            editing: false,
            mode: SearchMode::Literal,
            status: None,
        }
    }

    fn query(&self) -> Result<SearchQuery, ClientError> {
        SearchQuery::new(&self.input, self.mode)
    }

    fn visible<'a>(&self, jobs: &'a [Job]) -> Result<Vec<&'a Job>, ClientError> {
        Ok(filter_jobs(jobs, &self.query()?))
    }

    /// What goes to the server. A pattern is only meaningful locally, so regex
    /// mode fetches everything and filters here.
    fn keyword(&self) -> String {
        match self.mode {
            SearchMode::Literal => self.input.trim().to_string(),
            SearchMode::Regex => String::new(),
        }
    }

    fn clamp(&mut self, visible: usize) {
        if self.selected >= visible {
            self.selected = visible.saturating_sub(1);
        }
    }

    fn handle_key(&mut self, code: KeyCode, visible: usize, current: Option<&Job>) -> Command {
        if self.editing {
            return match code {
                KeyCode::Enter | KeyCode::Esc => {
                    self.editing = false;
                    Command::Nothing
                }
                KeyCode::Backspace => {
                    self.input.pop();
                    self.selected = 0;
                    Command::Search
                }
                KeyCode::Char(c) => {
                    self.input.push(c);
                    self.selected = 0;
                    Command::Search
                }
                _ => Command::Nothing,
            };
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
            KeyCode::Char('/') => {
                self.editing = true;
                Command::Nothing
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if visible > 0 && self.selected < visible - 1 {
                    self.selected += 1;
                    self.scroll_offset = 0;
                }
                Command::Nothing
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.selected > 0 {
                    self.selected -= 1;
                    self.scroll_offset = 0;
                }
                Command::Nothing
            }
            KeyCode::Char('J') | KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(3);
                Command::Nothing
            }
            KeyCode::Char('K') | KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(3);
                Command::Nothing
            }
            KeyCode::Char('r') => {
                self.mode = match self.mode {
                    SearchMode::Literal => SearchMode::Regex,
                    SearchMode::Regex => SearchMode::Literal,
                };
                Command::Search
            }
            KeyCode::Char('c') => {
                self.input.clear();
                self.selected = 0;
                Command::Search
            }
            KeyCode::Char('a') => match current {
                Some(job) => Command::Apply(job.id.clone()),
                None => Command::Nothing,
            },
            _ => Command::Nothing,
        }
    }
}

/// Interactive job browser. Searches run on a worker thread and come back
/// through fetch tickets, so only the newest search lands.
pub fn run_browse(backend: &dyn Backend, db: &Database, store: &mut Store) -> Result<()> {
    let notifier = RecordingNotifier::new();
    let services = Services::new(backend, db, &notifier);
    let scope = store.open_scope();

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = std::thread::scope(|s| {
        let (request_tx, request_rx) = mpsc::channel::<SearchRequest>();
        let (result_tx, result_rx) = mpsc::channel::<SearchResult>();
        s.spawn(move || {
            for (ticket, keyword) in request_rx {
                tracing::debug!(%keyword, "search worker fetching");
                let result = backend.jobs(&keyword);
                if result_tx.send((ticket, result)).is_err() {
                    break;
                }
            }
        });
        // The request sender is moved in and dropped on return, which ends the worker.
        run_loop(&mut terminal, &services, &notifier, store, scope, request_tx, result_rx)
    });

    store.close_scope(scope);

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn send_search(store: &mut Store, scope: ScopeId, view: &BrowseView, requests: &Sender<SearchRequest>) {
    store.dispatch(Action::Jobs(JobsAction::SetSearchedQuery(view.input.trim().to_string())));
    let ticket = store.begin_fetch(scope, Resource::Jobs);
    if requests.send((ticket, view.keyword())).is_err() {
        tracing::warn!("search worker is gone");
    }
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    services: &Services,
    notifier: &RecordingNotifier,
    store: &mut Store,
    scope: ScopeId,
    requests: Sender<SearchRequest>,
    results: Receiver<SearchResult>,
) -> Result<()> {
    let mut view = BrowseView::new(&store.state().jobs.searched_query);
    let mut list_state = ListState::default();
    send_search(store, scope, &view, &requests);

    loop {
        while let Ok((ticket, result)) = results.try_recv() {
            // Failures are already in the notifier; the loop keeps running.
            let _ = fetch::complete_jobs(services, store, &ticket, result);
        }
        if let Some(last) = notifier.take().pop() {
            view.status = Some(last);
        }

        let jobs = store.state().jobs.all_jobs.clone();
        let visible = view.visible(&jobs);
        let visible_len = visible.as_ref().map(Vec::len).unwrap_or(0);
        view.clamp(visible_len);
        list_state.select(if visible_len == 0 { None } else { Some(view.selected) });

        terminal.draw(|frame| draw(frame, &*store, &view, &visible, &mut list_state))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let current = visible
            .as_ref()
            .ok()
            .and_then(|jobs| jobs.get(view.selected).copied());
        match view.handle_key(key.code, visible_len, current) {
            Command::Nothing => {}
            Command::Quit => break,
            Command::Search => send_search(store, scope, &view, &requests),
            Command::Apply(job_id) => {
                let already_current = store
                    .state()
                    .jobs
                    .single_job
                    .as_ref()
                    .is_some_and(|job| job.id == job_id);
                if !already_current {
                    let job = jobs.iter().find(|job| job.id == job_id).cloned();
                    store.dispatch(Action::Jobs(JobsAction::SetSingleJob(job)));
                }
                let _ = actions::apply(services, store, &job_id);
            }
        }
    }
    Ok(())
}

fn draw(
    frame: &mut Frame,
    store: &Store,
    view: &BrowseView,
    visible: &Result<Vec<&Job>, ClientError>,
    list_state: &mut ListState,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    // Search box
    let mode = match view.mode {
        SearchMode::Literal => "literal",
        SearchMode::Regex => "regex",
    };
    let search_style = if view.editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let cursor = if view.editing { "_" } else { "" };
    let search = Paragraph::new(format!("{}{}", view.input, cursor))
        .style(search_style)
        .block(Block::default().borders(Borders::ALL).title(format!(" Search ({}) ", mode)));
    frame.render_widget(search, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[1]);

    // Left panel: job list
    let (items, title): (Vec<ListItem>, String) = match visible {
        Ok(jobs) => (
            jobs.iter()
                .map(|job| {
                    let applied = store.user().is_some_and(|user| job.has_applicant(&user.id));
                    let marker = if applied { "+" } else { " " };
                    ListItem::new(format!(
                        "{} {} | {}",
                        marker,
                        crate::truncate(&job.title, 32),
                        crate::truncate(job.company_name(), 20)
                    ))
                })
                .collect(),
            format!(" Jobs ({}) ", jobs.len()),
        ),
        Err(e) => (Vec::new(), format!(" {} ", e)),
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, columns[0], list_state);

    // Right panel: job detail
    let current = visible.as_ref().ok().and_then(|jobs| jobs.get(view.selected).copied());
    let detail = Paragraph::new(build_detail(store, current))
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((view.scroll_offset, 0));
    frame.render_widget(detail, columns[1]);

    // Footer: latest notification, else key help
    let footer = match &view.status {
        Some(note) => {
            let color = match note.level {
                Level::Error => Color::Red,
                Level::Success => Color::Green,
                Level::Info => Color::Gray,
            };
            Paragraph::new(format!(" {}", note.message)).style(Style::default().fg(color))
        }
        None => Paragraph::new(" /:search  r:regex  c:clear  j/k:navigate  J/K:scroll  a:apply  q:quit")
            .style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(footer, rows[2]);
}

fn build_detail<'a>(store: &Store, job: Option<&'a Job>) -> Text<'a> {
    let Some(job) = job else {
        return Text::raw("No job selected");
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        job.title.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!("at {}", job.company_name())));

    let applied = store.user().is_some_and(|user| {
        job.has_applicant(&user.id)
            || store
                .state()
                .jobs
                .single_job
                .as_ref()
                .is_some_and(|single| single.id == job.id && single.has_applicant(&user.id))
    });
    if applied {
        lines.push(Line::from(Span::styled("Already applied", Style::default().fg(Color::Cyan))));
    }

    lines.push(Line::from(""));
    if !job.location.is_empty() {
        lines.push(Line::from(format!("Location:   {}", job.location)));
    }
    if !job.job_type.is_empty() {
        lines.push(Line::from(format!("Type:       {}", job.job_type)));
    }
    if job.salary > 0.0 {
        lines.push(Line::from(format!("Salary:     {} LPA", job.salary)));
    }
    lines.push(Line::from(format!("Experience: {} yrs", job.experience_level)));
    lines.push(Line::from(format!("Openings:   {}", job.position)));
    lines.push(Line::from(format!("Applicants: {}", job.applications.len())));
    if let Some(days) = job.days_since_posted(chrono::Utc::now()) {
        let posted = if days == 0 {
            "Posted today".to_string()
        } else {
            format!("Posted {} days ago", days)
        };
        lines.push(Line::from(Span::styled(posted, Style::default().fg(Color::DarkGray))));
    }
    lines.push(Line::from(""));

    if !job.requirements.is_empty() {
        lines.push(Line::from(Span::styled(
            "Requirements",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for requirement in &job.requirements {
            lines.push(Line::from(format!("  - {}", requirement)));
        }
        lines.push(Line::from(""));
    }

    if job.description.trim().is_empty() {
        lines.push(Line::from(Span::styled(
            "(No description)",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Description",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for line in textwrap::fill(&job.description, 70).lines() {
            lines.push(Line::from(format!("  {}", line)));
        }
    }

    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::job;

    fn jobs() -> Vec<Job> {
        vec![
            job("j1", "C++ Engineer", Some("Acme")),
            job("j2", "Rust Developer", Some("Globex")),
            job("j3", "Data Analyst", None),
        ]
    }

    #[test]
    fn test_typing_edits_query_and_searches() {
        let mut view = BrowseView::new("");
        assert_eq!(view.handle_key(KeyCode::Char('/'), 3, None), Command::Nothing);
        assert!(view.editing);
        assert_eq!(view.handle_key(KeyCode::Char('c'), 3, None), Command::Search);
        assert_eq!(view.handle_key(KeyCode::Char('+'), 3, None), Command::Search);
        assert_eq!(view.handle_key(KeyCode::Char('+'), 3, None), Command::Search);
        assert_eq!(view.input, "c++");
        view.handle_key(KeyCode::Enter, 3, None);
        assert!(!view.editing);

        let all = jobs();
        let visible = view.visible(&all).unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "j1");
        assert_eq!(view.keyword(), "c++");
    }

    #[test]
    fn test_regex_toggle() {
        let mut view = BrowseView::new("^(rust|data)");
        let all = jobs();
        assert!(view.visible(&all).unwrap().is_empty());

        assert_eq!(view.handle_key(KeyCode::Char('r'), 0, None), Command::Search);
        assert_eq!(view.mode, SearchMode::Regex);
        assert_eq!(view.keyword(), "");
        let ids: Vec<_> = view.visible(&all).unwrap().iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["j2", "j3"]);

        view.input = "(".into();
        assert!(view.visible(&all).unwrap_err().is_validation());
    }

    #[test]
    fn test_navigation_and_apply() {
        let all = jobs();
        let mut view = BrowseView::new("");
        view.handle_key(KeyCode::Char('j'), 3, None);
        view.handle_key(KeyCode::Char('j'), 3, None);
        view.handle_key(KeyCode::Char('j'), 3, None);
        assert_eq!(view.selected, 2);

        assert_eq!(
            view.handle_key(KeyCode::Char('a'), 3, all.get(2)),
            Command::Apply("j3".into())
        );
        assert_eq!(view.handle_key(KeyCode::Char('a'), 0, None), Command::Nothing);

        view.clamp(1);
        assert_eq!(view.selected, 0);
        assert_eq!(view.handle_key(KeyCode::Char('q'), 1, None), Command::Quit);
    }
}
