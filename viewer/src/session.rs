use serde::Deserialize;
use thiserror::Error;

use crate::area::resolve_areas;
use crate::board::BoardRenderer;
use crate::replay::{NavParams, Replayer, StepOutcome};
use crate::sources::{EventLogSource, SourceError, TemplateSource};
use crate::template::{parse_template, ParseError, TemplatePatch, DEFAULT_PATCHES};

/// Board file payload once the one-line header is stripped: the `map` key
/// holds the template text.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardFile {
    pub map: String,
}

/// Failures that abort session startup. Nothing renders after any of these.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load session inputs: {0}")]
    Source(#[from] SourceError),
    #[error("board file is not valid YAML: {0}")]
    MalformedBoardFile(#[from] serde_yaml::Error),
    #[error("map template is malformed: {0}")]
    Template(#[from] ParseError),
}

/// One replay session: the static spatial model plus the replay state
/// machine, built from the two awaited-once sources. Sessions share nothing;
/// several can coexist.
pub struct Session {
    replayer: Replayer,
}

impl Session {
    /// Load the template and event log, build the spatial model, and position
    /// the cursor. Applies the default board's patch list.
    pub async fn load(
        templates: &impl TemplateSource,
        logs: &impl EventLogSource,
        params: NavParams,
    ) -> Result<Self, StartupError> {
        Self::load_with_patches(templates, logs, params, &DEFAULT_PATCHES).await
    }

    pub async fn load_with_patches(
        templates: &impl TemplateSource,
        logs: &impl EventLogSource,
        params: NavParams,
        patches: &[TemplatePatch],
    ) -> Result<Self, StartupError> {
        let blob = templates.fetch_template().await?;
        let board_file: BoardFile = serde_yaml::from_str(strip_header(&blob))?;
        let template = parse_template(&board_file.map, patches)?;
        let areas = resolve_areas(&template);
        let board = BoardRenderer::new(template, areas);

        let events = logs.fetch_events().await?;
        Ok(Self {
            replayer: Replayer::new(events, params, board),
        })
    }

    pub fn step_once(&mut self) -> Option<StepOutcome> {
        self.replayer.step_once()
    }

    pub fn finish_group_or_advance(&mut self) -> Vec<StepOutcome> {
        self.replayer.finish_group_or_advance()
    }

    pub fn cursor(&self) -> usize {
        self.replayer.cursor()
    }

    pub fn len(&self) -> usize {
        self.replayer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replayer.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.replayer.is_finished()
    }

    pub fn replayer_mut(&mut self) -> &mut Replayer {
        &mut self.replayer
    }
}

/// Discard the one-line header of a board file blob.
fn strip_header(blob: &str) -> &str {
    blob.split_once('\n').map(|(_, rest)| rest).unwrap_or("")
}
