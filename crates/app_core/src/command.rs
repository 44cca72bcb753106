//! Command bar: the file commands, their buttons and handlers

use crate::input::TouchPoint;
use crate::layout::{Layout, Rect};
use crate::{AppError, ApplicationContext};
use app_fs::ClipboardMode;
use std::path::PathBuf;

/// File command offered by the command bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    None,
    Copy,
    Cut,
    Paste,
    Rename,
    Delete,
}

impl Command {
    /// Commands in command bar order
    pub const MENU: [Command; 5] = [
        Command::Copy,
        Command::Cut,
        Command::Paste,
        Command::Rename,
        Command::Delete,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Command::None => "",
            Command::Copy => "Copy",
            Command::Cut => "Cut",
            Command::Paste => "Paste",
            Command::Rename => "Rename",
            Command::Delete => "Delete",
        }
    }

    /// Operates on the selected entry
    pub fn needs_selection(self) -> bool {
        matches!(
            self,
            Command::Copy | Command::Cut | Command::Rename | Command::Delete
        )
    }
}

/// Command handler
pub type CommandHandler = fn(&mut ApplicationContext) -> Result<(), AppError>;

fn handler_for(command: Command) -> Option<CommandHandler> {
    match command {
        Command::None => None,
        Command::Copy => Some(ApplicationContext::copy_selected as CommandHandler),
        Command::Cut => Some(ApplicationContext::cut_selected as CommandHandler),
        Command::Paste => Some(ApplicationContext::paste_pending as CommandHandler),
        Command::Rename => Some(ApplicationContext::rename_selected as CommandHandler),
        Command::Delete => Some(ApplicationContext::request_delete as CommandHandler),
    }
}

/// One command bar button
#[derive(Clone, Copy)]
pub struct CommandButton {
    pub command: Command,
    pub rect: Rect,
    pub handler: CommandHandler,
}

impl std::fmt::Debug for CommandButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandButton")
            .field("command", &self.command)
            .field("rect", &self.rect)
            .finish()
    }
}

/// Command bar laid over the info panel
#[derive(Debug, Clone)]
pub struct CommandTable {
    buttons: Vec<CommandButton>,
}

impl CommandTable {
    pub fn new(layout: &Layout) -> Self {
        let buttons = Command::MENU
            .into_iter()
            .zip(layout.info.columns(Command::MENU.len()))
            .filter_map(|(command, rect)| {
                handler_for(command).map(|handler| CommandButton {
                    command,
                    rect,
                    handler,
                })
            })
            .collect();

        Self { buttons }
    }

    pub fn buttons(&self) -> &[CommandButton] {
        &self.buttons
    }

    /// Button under a touch
    pub fn hit(&self, point: TouchPoint) -> Option<&CommandButton> {
        self.buttons.iter().find(|b| b.rect.contains(point))
    }

    pub fn command_at(&self, point: TouchPoint) -> Command {
        self.hit(point).map_or(Command::None, |b| b.command)
    }

    pub fn rect_of(&self, command: Command) -> Option<Rect> {
        self.buttons.iter().find(|b| b.command == command).map(|b| b.rect)
    }
}

/// Copy or cut waiting for a paste
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommand {
    pub mode: ClipboardMode,
    /// Absolute path of the source entry
    pub source: PathBuf,
}

impl PendingCommand {
    pub fn name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_info_panel() {
        let layout = Layout::default();
        let table = CommandTable::new(&layout);
        assert_eq!(table.buttons().len(), 5);

        let info = layout.info;
        let y = info.y + info.h / 2;
        assert_eq!(table.command_at(TouchPoint::new(info.x + 1, y)), Command::Copy);
        assert_eq!(table.command_at(TouchPoint::new(info.right() - 1, y)), Command::Delete);
        assert_eq!(table.command_at(TouchPoint::new(info.x + 1, info.y - 1)), Command::None);
    }

    #[test]
    fn test_buttons_do_not_overlap() {
        let table = CommandTable::new(&Layout::default());
        for pair in table.buttons().windows(2) {
            assert!(pair[0].rect.right() <= pair[1].rect.x);
        }
        let paste = table.rect_of(Command::Paste);
        assert!(paste.is_some());
        assert_eq!(table.rect_of(Command::None), None);
    }

    #[test]
    fn test_pending_name() {
        let pending = PendingCommand {
            mode: ClipboardMode::Cut,
            source: PathBuf::from("/root/file.txt"),
        };
        assert_eq!(pending.name(), "file.txt");
        assert!(Command::Delete.needs_selection());
        assert!(!Command::Paste.needs_selection());
    }
}
