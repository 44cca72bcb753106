//! Application context: everything one running file manager owns

use crate::command::{CommandTable, PendingCommand};
use crate::host::{FileOpener, IconResolver, LogOpener, NoIconResolver};
use crate::icon_cache::IconCache;
use crate::input::{Action, InputMap, InputSnapshot};
use crate::layout::Layout;
use crate::operation::OperationState;
use crate::region::{DirtySet, RegionInvalidation, StatusLevel, StatusMessage};
use crate::selection::SelectionModel;
use crate::{AppConfig, AppError};
use app_fs::{DirEntry, FileSystem, Listing};
use std::path::{Path, PathBuf};

/// What the host should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Exit,
}

/// Main application state.
///
/// Owns the listing and every piece of state that indexes into it, so a
/// navigation or delete can reset all of them within one call.
pub struct ApplicationContext {
    pub(crate) config: AppConfig,
    pub(crate) layout: Layout,
    pub(crate) fs: Box<dyn FileSystem>,
    pub(crate) cwd: PathBuf,
    pub(crate) listing: Listing,
    pub(crate) selection: SelectionModel,
    pub(crate) regions: RegionInvalidation,
    pub(crate) icons: IconCache,
    pub(crate) commands: CommandTable,
    pub(crate) pending: Option<PendingCommand>,
    pub(crate) state: OperationState,
    pub(crate) input_map: InputMap,
    pub(crate) resolver: Box<dyn IconResolver>,
    pub(crate) opener: Box<dyn FileOpener>,
}

/// Borrowed view handed to the render pass
pub struct RenderFrame<'a> {
    /// Regions and rows to redraw, already drained
    pub dirty: DirtySet,
    pub layout: &'a Layout,
    pub cwd: &'a Path,
    pub listing: &'a Listing,
    pub selection: &'a SelectionModel,
    pub state: &'a OperationState,
    pub pending: Option<&'a PendingCommand>,
    pub status: Option<&'a StatusMessage>,
    pub commands: &'a CommandTable,
    pub icons: &'a mut IconCache,
    pub resolver: &'a dyn IconResolver,
}

impl ApplicationContext {
    /// Create the context. Nothing is scanned until [`activate`](Self::activate).
    pub fn new(config: AppConfig, fs: Box<dyn FileSystem>) -> Self {
        let layout = Layout::from_config(&config.layout);
        let cwd = fs.current_dir();

        Self {
            selection: SelectionModel::new(layout.visible_rows),
            regions: RegionInvalidation::new(config.status.duration_ticks),
            icons: IconCache::new(
                layout.visible_rows + config.layout.icon_slack,
                layout.icon_size.max(0) as u32,
                config.executables.clone(),
            ),
            commands: CommandTable::new(&layout),
            input_map: InputMap::new(&config.keybindings),
            pending: None,
            state: OperationState::Browsing,
            listing: Listing::new(),
            resolver: Box::new(NoIconResolver),
            opener: Box::new(LogOpener),
            cwd,
            fs,
            layout,
            config,
        }
    }

    pub fn with_resolver(mut self, resolver: Box<dyn IconResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_opener(mut self, opener: Box<dyn FileOpener>) -> Self {
        self.opener = opener;
        self
    }

    /// Load the start directory and enter Browsing.
    ///
    /// Only fatal errors are returned; an unreadable start directory leaves
    /// an empty listing and a status message.
    pub fn activate(&mut self) -> Result<(), AppError> {
        let fallback = self.fs.current_dir();
        let start = self
            .config
            .general
            .start_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| fallback.clone());

        tracing::info!("Activating in {}", start.display());
        let result = match self.navigate(start.clone()) {
            Err(e) if e.is_recoverable() && start != fallback => {
                self.settle(Err(e))?;
                self.navigate(fallback)
            }
            other => other,
        };
        self.settle(result)?;

        self.state = OperationState::Browsing;
        self.regions.mark_all();
        Ok(())
    }

    /// Run one tick: status countdown, buttons, then touch.
    ///
    /// Recoverable failures become status messages; only fatal ones are
    /// returned.
    pub fn tick(&mut self, input: &InputSnapshot) -> Result<TickOutcome, AppError> {
        self.regions.tick();

        let actions = self.input_map.actions(input);
        if actions.contains(&Action::Back) {
            tracing::info!("Back pressed, exiting");
            return Ok(TickOutcome::Exit);
        }

        for action in actions {
            tracing::debug!("Action {:?} in {}", action, self.state.name());
            let result = self.handle_action(action);
            self.settle(result)?;
        }

        if let Some(point) = input.touch {
            tracing::debug!("Touch ({}, {}) in {}", point.x, point.y, self.state.name());
            let result = self.handle_touch(point);
            self.settle(result)?;
        }

        Ok(TickOutcome::Continue)
    }

    /// Turn a recoverable error into a status message
    fn settle(&mut self, result: Result<(), AppError>) -> Result<(), AppError> {
        let Err(err) = result else {
            return Ok(());
        };

        if matches!(self.state, OperationState::Busy(_)) {
            self.set_state(OperationState::Browsing);
        }
        if err.is_fatal() {
            tracing::error!("Fatal: {}", err);
            return Err(err);
        }

        let level = match &err {
            AppError::Operation(op) if op.is_not_implemented() => StatusLevel::Info,
            _ => StatusLevel::Error,
        };
        tracing::warn!("{}", err);
        self.regions.show_status(err.user_message(), level);
        Ok(())
    }

    /// Replace the listing with the contents of `target`.
    ///
    /// The directory is scanned before anything changes, so a failure leaves
    /// the current listing, selection and pending command untouched.
    pub(crate) fn navigate(&mut self, target: PathBuf) -> Result<(), AppError> {
        let path = self.fs.resolve(&target);
        let listing = app_fs::scan(self.fs.as_ref(), &path)
            .map_err(|e| AppError::scan_failure(path.display().to_string(), e))?;
        self.fs
            .change_directory(&path)
            .map_err(|e| AppError::scan_failure(path.display().to_string(), e))?;

        self.cwd = self.fs.current_dir();
        self.listing = listing;
        if let Some(pending) = self.pending.take() {
            tracing::info!(
                "Pending {} of {} dropped",
                pending.mode.label(),
                pending.source.display()
            );
        }
        self.icons.invalidate_all();
        self.selection.reset(&mut self.regions);
        tracing::info!("Entered {} ({} entries)", self.cwd.display(), self.listing.len());
        Ok(())
    }

    pub(crate) fn enter_parent(&mut self) -> Result<(), AppError> {
        match self.cwd.parent() {
            Some(parent) => self.navigate(parent.to_path_buf()),
            None => {
                tracing::debug!("Already at the root");
                Ok(())
            }
        }
    }

    /// Force a full redraw, e.g. after the host lost the surface contents
    pub fn redraw_all(&mut self) {
        self.regions.mark_all();
    }

    /// Borrow everything the render pass needs and drain the dirty set
    pub fn frame(&mut self) -> RenderFrame<'_> {
        RenderFrame {
            dirty: self.regions.drain(),
            layout: &self.layout,
            cwd: &self.cwd,
            listing: &self.listing,
            selection: &self.selection,
            state: &self.state,
            pending: self.pending.as_ref(),
            status: self.regions.status(),
            commands: &self.commands,
            icons: &mut self.icons,
            resolver: self.resolver.as_ref(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn selected_entry(&self) -> Option<&DirEntry> {
        self.selection.selected().and_then(|i| self.listing.get(i))
    }

    pub fn state(&self) -> &OperationState {
        &self.state
    }

    pub fn pending(&self) -> Option<&PendingCommand> {
        self.pending.as_ref()
    }

    pub fn regions(&self) -> &RegionInvalidation {
        &self.regions
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.regions.status()
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    pub fn icons(&self) -> &IconCache {
        &self.icons
    }
}
