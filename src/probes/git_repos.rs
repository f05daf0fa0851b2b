//! Table of git repositories found under the search roots.
//!
//! Two schedules drive this probe: the repository list is rediscovered every 30 s and
//! each record refreshes its own status every 10 s. Records survive rediscovery as long
//! as their path is still found, so a rescan never resets their status or timing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use ratatui::{
    prelude::*,
    widgets::{Cell, Row, Table, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::core::config::SearchRoot;
use crate::core::dashboard::{stacked_height, Probe, RefreshSchedule, Refreshable};
use crate::git::{discover_repositories, RepoStatus, RepoStatusSource, RepoWalker, StatusKind};
use crate::ui::dashboard::widgets::titled_block;
use crate::ui::formatters::right_justify;

pub const REDISCOVERY_INTERVAL: Duration = Duration::from_secs(30);
pub const STATUS_INTERVAL: Duration = Duration::from_secs(10);

const MIN_NAME_WIDTH: usize = 26;
const MIN_BRANCH_WIDTH: u16 = 37;

/// `~/rel` when `path` lies under `home` (or its canonical form), else the path itself
pub fn home_relative(path: &Path, home: Option<&Path>, canonical_home: Option<&Path>) -> String {
    for base in [home, canonical_home].into_iter().flatten() {
        if path.starts_with(base) {
            if let Some(rel) = pathdiff::diff_paths(path, base) {
                return Path::new("~").join(rel).display().to_string();
            }
        }
    }
    path.display().to_string()
}

#[derive(Debug, Clone)]
pub struct RepoRecord {
    pub name: String,
    pub full_path: PathBuf,
    pub home_path: String,
    pub status: Option<RepoStatus>,
    schedule: RefreshSchedule,
}

impl RepoRecord {
    fn new(full_path: PathBuf, home: Option<&Path>, canonical_home: Option<&Path>) -> Self {
        let name = full_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| full_path.display().to_string());
        let home_path = home_relative(&full_path, home, canonical_home);

        Self {
            name,
            full_path,
            home_path,
            status: None,
            schedule: RefreshSchedule::new(STATUS_INTERVAL),
        }
    }

    fn refresh<S: RepoStatusSource>(&mut self, source: &S, now: Instant) {
        if !self.schedule.should_refresh(now) {
            return;
        }
        match source.status(&self.full_path) {
            Ok(status) => self.status = Some(status),
            Err(e) => log::warn!("[git] Failed to get status for {} ({}): {}", self.name, self.full_path.display(), e),
        }
    }
}

fn kind_style(kind: StatusKind) -> Style {
    let bold = Modifier::BOLD;
    match kind {
        StatusKind::Modified => Style::default().fg(Color::Green),
        StatusKind::Added => Style::default().fg(Color::Green).add_modifier(bold),
        StatusKind::Deleted => Style::default().fg(Color::Red).add_modifier(bold),
        StatusKind::Renamed => Style::default().fg(Color::Yellow).add_modifier(bold),
        StatusKind::Unmerged => Style::default().fg(Color::Magenta).add_modifier(bold),
        StatusKind::Untracked => Style::default().fg(Color::Red),
    }
}

pub struct GitReposProbe<W: RepoWalker, S: RepoStatusSource> {
    walker: W,
    source: S,
    roots: Vec<SearchRoot>,
    home: Option<PathBuf>,
    canonical_home: Option<PathBuf>,
    discovery: RefreshSchedule,
    repos: Vec<RepoRecord>,
}

impl<W: RepoWalker, S: RepoStatusSource> GitReposProbe<W, S> {
    pub fn new(walker: W, source: S, roots: Vec<SearchRoot>) -> Self {
        let home = dirs::home_dir();
        let canonical_home = home.as_deref().and_then(|h| h.canonicalize().ok());
        Self::with_home(walker, source, roots, home, canonical_home)
    }

    pub fn with_home(
        walker: W,
        source: S,
        roots: Vec<SearchRoot>,
        home: Option<PathBuf>,
        canonical_home: Option<PathBuf>,
    ) -> Self {
        Self {
            walker,
            source,
            roots,
            home,
            canonical_home,
            discovery: RefreshSchedule::new(REDISCOVERY_INTERVAL),
            repos: Vec::new(),
        }
    }

    pub fn repos(&self) -> &[RepoRecord] {
        &self.repos
    }

    /// Rebuild the record list, carrying over records whose path is still present
    fn rediscover(&mut self) {
        let paths = discover_repositories(&self.walker, &self.roots);

        let mut existing: HashMap<PathBuf, RepoRecord> = self
            .repos
            .drain(..)
            .map(|r| (r.full_path.clone(), r))
            .collect();

        self.repos = paths
            .into_iter()
            .map(|path| {
                existing.remove(&path).unwrap_or_else(|| {
                    RepoRecord::new(path, self.home.as_deref(), self.canonical_home.as_deref())
                })
            })
            .collect();
    }

    fn name_width(&self) -> usize {
        self.repos
            .iter()
            .map(|r| r.home_path.width())
            .max()
            .unwrap_or(0)
            .max(MIN_NAME_WIDTH)
    }

    fn row(&self, repo: &RepoRecord, name_width: usize) -> Row<'static> {
        let parent = Path::new(&repo.home_path)
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let pad = name_width.saturating_sub(repo.name.width());

        let name = Line::from(vec![
            Span::styled(
                format!("{}/", right_justify(pad, &parent)),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                repo.name.clone(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        ]);

        let (branch, counts) = match &repo.status {
            Some(status) => {
                let color = if status.branch.is_mainline() {
                    Color::Green
                } else {
                    Color::Cyan
                };
                let mut spans = vec![Span::styled(status.branch.name.clone(), Style::default().fg(color))];
                if let Some(tracking) = &status.branch.tracking {
                    spans.push(Span::raw(" "));
                    spans.push(Span::styled(tracking.clone(), Style::default().fg(Color::Magenta)));
                }

                let mut counts = Vec::new();
                for (kind, n) in status.counts.nonzero() {
                    if !counts.is_empty() {
                        counts.push(Span::raw(" "));
                    }
                    counts.push(Span::styled(format!("{}:{}", kind.symbol(), n), kind_style(kind)));
                }
                (Line::from(spans), Line::from(counts))
            }
            None => (Line::from(""), Line::from("")),
        };

        Row::new(vec![Cell::from(name), Cell::from(branch), Cell::from(counts)])
    }
}

impl<W: RepoWalker, S: RepoStatusSource> Probe for GitReposProbe<W, S> {
    fn name(&self) -> &str {
        "git"
    }

    fn refresh(&mut self, now: Instant) {
        if self.discovery.should_refresh(now) {
            self.rediscover();
        }
        for repo in &mut self.repos {
            repo.refresh(&self.source, now);
        }
    }

    fn on_resize(&mut self, _width: u16, _height: u16) {}

    fn height(&self) -> u16 {
        stacked_height(2, self.repos.len(), 1)
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let name_width = self.name_width();
        let rows: Vec<Row> = self.repos.iter().map(|r| self.row(r, name_width)).collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(u16::try_from(name_width).unwrap_or(u16::MAX).saturating_add(1)),
                Constraint::Min(MIN_BRANCH_WIDTH),
                Constraint::Fill(1),
            ],
        )
        .block(titled_block(" Git Repos "));
        Widget::render(table, area, buf);
    }

    fn schedule(&self) -> Option<&RefreshSchedule> {
        Some(&self.discovery)
    }
}
