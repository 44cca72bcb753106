//! Operation state machine
//!
//! Browsing <-> CommandMenu on the toggle button. Command bar buttons run
//! their handlers; delete goes through ConfirmDelete, paste and rename pass
//! through Busy. Both always come back to Browsing.

use crate::command::{Command, PendingCommand};
use crate::input::{Action, TouchPoint};
use crate::region::{Region, StatusLevel};
use crate::{AppError, ApplicationContext};
use app_fs::{ClipboardMode, DirEntry, FileOpError, FileOpsExecutor};

/// Active screen mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationState {
    Browsing,
    CommandMenu,
    /// Yes/No prompt for deleting the entry at `index`
    ConfirmDelete { index: usize, name: String },
    /// A command is running; never observable between ticks
    Busy(Command),
}

impl OperationState {
    pub fn name(&self) -> &'static str {
        match self {
            OperationState::Browsing => "Browsing",
            OperationState::CommandMenu => "CommandMenu",
            OperationState::ConfirmDelete { .. } => "ConfirmDelete",
            OperationState::Busy(_) => "Busy",
        }
    }

    /// The info panel shows the command bar
    pub fn shows_command_bar(&self) -> bool {
        matches!(self, OperationState::CommandMenu)
    }

    /// The confirmation dialog covers the list
    pub fn shows_dialog(&self) -> bool {
        matches!(self, OperationState::ConfirmDelete { .. })
    }
}

impl ApplicationContext {
    pub(crate) fn set_state(&mut self, next: OperationState) {
        if self.state == next {
            return;
        }
        if self.state.shows_command_bar() != next.shows_command_bar() {
            self.regions.mark_dirty(Region::Info);
        }
        if self.state.shows_dialog() != next.shows_dialog() {
            self.regions.mark_dirty(Region::List);
        }
        tracing::debug!("State: {} -> {}", self.state.name(), next.name());
        self.state = next;
    }

    pub(crate) fn handle_action(&mut self, action: Action) -> Result<(), AppError> {
        if let OperationState::ConfirmDelete { .. } = self.state {
            // the dialog is modal
            return match action {
                Action::Accept => self.confirm_delete(),
                Action::Cancel => {
                    self.cancel_delete();
                    Ok(())
                }
                _ => Ok(()),
            };
        }
        if let OperationState::Busy(_) = self.state {
            return Ok(());
        }

        let len = self.listing.len();
        let page = self.selection.visible_rows() as isize;
        match action {
            // handled before dispatch
            Action::Back => {}
            Action::ToggleViews => self.toggle_views(),
            Action::ScrollUp => {
                self.selection.scroll_by(-1, len, &mut self.regions);
            }
            Action::ScrollDown => {
                self.selection.scroll_by(1, len, &mut self.regions);
            }
            Action::PageUp => {
                self.selection.scroll_by(-page, len, &mut self.regions);
            }
            Action::PageDown => {
                self.selection.scroll_by(page, len, &mut self.regions);
            }
            Action::Parent => return self.enter_parent(),
            Action::Accept => {
                if let Some(index) = self.selection.selected() {
                    return self.activate_entry(index);
                }
            }
            Action::Cancel => {
                if self.state.shows_command_bar() {
                    self.set_state(OperationState::Browsing);
                } else {
                    self.selection.clear_selection(&mut self.regions);
                }
            }
        }
        Ok(())
    }

    pub(crate) fn handle_touch(&mut self, point: TouchPoint) -> Result<(), AppError> {
        match self.state {
            OperationState::ConfirmDelete { .. } => {
                let (yes, no) = self.layout.dialog_buttons();
                if yes.contains(point) {
                    return self.confirm_delete();
                }
                if no.contains(point) {
                    self.cancel_delete();
                }
                Ok(())
            }
            OperationState::Busy(_) => Ok(()),
            OperationState::CommandMenu if self.layout.info.contains(point) => {
                match self.commands.hit(point).copied() {
                    Some(button) => {
                        tracing::debug!("Command {:?}", button.command);
                        (button.handler)(self)
                    }
                    None => Ok(()),
                }
            }
            OperationState::Browsing | OperationState::CommandMenu => {
                match self.layout.row_at(point) {
                    Some(row) => self.touch_row(row),
                    None => Ok(()),
                }
            }
        }
    }

    fn toggle_views(&mut self) {
        let next = if self.state.shows_command_bar() {
            OperationState::Browsing
        } else {
            OperationState::CommandMenu
        };
        self.set_state(next);
    }

    /// First touch selects, touching the selection again activates it
    fn touch_row(&mut self, row: usize) -> Result<(), AppError> {
        let len = self.listing.len();
        let Some(index) = self.selection.index_at_row(row, len) else {
            return Ok(());
        };

        if self.selection.selected() == Some(index) {
            self.activate_entry(index)
        } else {
            self.selection.select_at(index, len, &mut self.regions);
            Ok(())
        }
    }

    /// Enter a directory or hand a file to the opener
    fn activate_entry(&mut self, index: usize) -> Result<(), AppError> {
        let Some(entry) = self.listing.get(index) else {
            return Ok(());
        };

        if entry.is_parent() {
            return self.enter_parent();
        }
        let path = self.cwd.join(&entry.name);
        if entry.is_dir {
            return self.navigate(path);
        }

        tracing::info!("Opening {}", path.display());
        self.opener.open_file(&path);
        Ok(())
    }

    /// Selected entry a command may act on
    fn command_target(&self) -> Result<(usize, &DirEntry), AppError> {
        let index = self.selection.selected().ok_or(AppError::NoSelection)?;
        let entry = self.listing.get(index).ok_or(AppError::NoSelection)?;
        if entry.is_parent() {
            return Err(AppError::ParentEntry);
        }
        Ok((index, entry))
    }

    fn set_pending(&mut self, mode: ClipboardMode) -> Result<(), AppError> {
        let (_, entry) = self.command_target()?;
        let pending = PendingCommand {
            mode,
            source: self.cwd.join(&entry.name),
        };
        let verb = match mode {
            ClipboardMode::Copy => "Copied",
            ClipboardMode::Cut => "Cut",
        };
        let text = format!("{}: {}", verb, entry.name);

        tracing::info!("{} pending: {}", mode.label(), pending.source.display());
        self.pending = Some(pending);
        self.regions.mark_dirty(Region::Info);
        self.regions.show_status(text, StatusLevel::Info);
        Ok(())
    }

    pub(crate) fn copy_selected(&mut self) -> Result<(), AppError> {
        self.set_pending(ClipboardMode::Copy)
    }

    pub(crate) fn cut_selected(&mut self) -> Result<(), AppError> {
        self.set_pending(ClipboardMode::Cut)
    }

    /// Run the pending copy / cut into the working directory
    pub(crate) fn paste_pending(&mut self) -> Result<(), AppError> {
        let pending = self.pending.take().ok_or(AppError::NothingToPaste)?;
        self.regions.mark_dirty(Region::Info);

        self.set_state(OperationState::Busy(Command::Paste));
        let result =
            FileOpsExecutor::new(self.fs.as_mut()).paste(pending.mode, &pending.source, &self.cwd);
        self.set_state(OperationState::Browsing);
        result.map_err(Into::into)
    }

    pub(crate) fn rename_selected(&mut self) -> Result<(), AppError> {
        let (_, entry) = self.command_target()?;
        let path = self.cwd.join(&entry.name);

        self.set_state(OperationState::Busy(Command::Rename));
        let result = FileOpsExecutor::new(self.fs.as_mut()).rename(&path);
        self.set_state(OperationState::Browsing);
        result.map_err(Into::into)
    }

    pub(crate) fn request_delete(&mut self) -> Result<(), AppError> {
        let (index, entry) = self.command_target()?;
        let name = entry.name.clone();
        tracing::debug!("Confirm delete of {}", name);
        self.set_state(OperationState::ConfirmDelete { index, name });
        Ok(())
    }

    fn cancel_delete(&mut self) {
        tracing::debug!("Delete cancelled");
        self.set_state(OperationState::Browsing);
    }

    fn confirm_delete(&mut self) -> Result<(), AppError> {
        let (index, name) = match &self.state {
            OperationState::ConfirmDelete { index, name } => (*index, name.clone()),
            _ => return Ok(()),
        };

        self.set_state(OperationState::Busy(Command::Delete));
        let still_listed = self.listing.get(index).is_some_and(|e| e.name == name);
        let result = if still_listed {
            FileOpsExecutor::new(self.fs.as_mut()).delete(&mut self.listing, index)
        } else {
            Err(FileOpError::InvalidOperation(format!("{} is no longer listed", name)))
        };
        self.set_state(OperationState::Browsing);

        let removed = result?;
        self.icons.invalidate_all();
        self.selection.reset(&mut self.regions);
        self.regions
            .show_status(format!("Deleted: {}", removed.name), StatusLevel::Success);
        Ok(())
    }
}
