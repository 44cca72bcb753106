//! Render pass: draws exactly the regions a frame reports dirty

use crate::surface::{fitting_glyphs, RenderSurface, GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::theme::{Color, Theme};
use app_core::{Command, Rect, Region, RenderFrame};

/// Draws frames onto a surface
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    theme: Theme,
    frames: u64,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme, frames: 0 }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Render passes that drew something
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Redraw the dirty regions of `frame`.
    ///
    /// Every region is cleared before it is drawn, so drawing unchanged state
    /// again produces the same pixels. Returns false when nothing was dirty.
    pub fn render(&mut self, mut frame: RenderFrame<'_>, surface: &mut dyn RenderSurface) -> bool {
        if frame.dirty.is_empty() {
            return false;
        }
        let regions = frame.dirty.regions;
        tracing::trace!(
            "Render: {:?}, rows {:?}",
            regions.iter().collect::<Vec<_>>(),
            frame.dirty.rows
        );

        if regions.contains(Region::Path) {
            self.draw_path(&frame, surface);
        }

        let list_drawn = if regions.contains(Region::List) {
            self.draw_list(&mut frame, surface);
            true
        } else {
            self.draw_rows(&mut frame, surface)
        };
        if list_drawn && frame.state.shows_dialog() {
            self.draw_dialog(&frame, surface);
        }

        if regions.contains(Region::Info) {
            if frame.state.shows_command_bar() {
                self.draw_command_bar(&frame, surface);
            } else {
                self.draw_info(&frame, surface);
            }
        }

        if regions.contains(Region::Status) {
            self.draw_status(&frame, surface);
        }

        self.frames += 1;
        true
    }

    fn text_origin(&self, rect: Rect) -> (i32, i32) {
        (rect.x + 4, rect.y + (rect.h - GLYPH_HEIGHT) / 2)
    }

    fn stroke_rect(&self, surface: &mut dyn RenderSurface, rect: Rect, color: Color) {
        surface.fill_rect(Rect::new(rect.x, rect.y, rect.w, 1), color);
        surface.fill_rect(Rect::new(rect.x, rect.bottom() - 1, rect.w, 1), color);
        surface.fill_rect(Rect::new(rect.x, rect.y, 1, rect.h), color);
        surface.fill_rect(Rect::new(rect.right() - 1, rect.y, 1, rect.h), color);
    }

    fn centered_label(
        &self,
        surface: &mut dyn RenderSurface,
        rect: Rect,
        text: &str,
        color: Color,
    ) {
        let width = text.chars().count() as i32 * GLYPH_WIDTH;
        let x = rect.x + ((rect.w - width) / 2).max(2);
        let y = rect.y + (rect.h - GLYPH_HEIGHT) / 2;
        surface.draw_text(x, y, text, color, rect);
    }

    fn draw_path(&self, frame: &RenderFrame<'_>, surface: &mut dyn RenderSurface) {
        let rect = frame.layout.path;
        surface.fill_rect(rect, self.theme.bar);

        let (x, y) = self.text_origin(rect);
        let path = frame.cwd.display().to_string();
        let fits = fitting_glyphs(x, rect);
        let count = path.chars().count();

        // keep the deepest part of long paths
        let text = if count > fits && fits > 3 {
            let tail: String = path.chars().skip(count - (fits - 3)).collect();
            format!("...{}", tail)
        } else {
            path
        };
        surface.draw_text(x, y, &text, self.theme.bar_text, rect);
    }

    fn draw_list(&self, frame: &mut RenderFrame<'_>, surface: &mut dyn RenderSurface) {
        surface.fill_rect(frame.layout.list, self.theme.background);

        let window = frame.selection.visible_window(frame.listing.len());
        let scroll = window.start;
        for index in window {
            self.draw_row(frame, surface, index - scroll, index);
        }
    }

    /// Row-scoped redraw; rows scrolled out of view are skipped
    fn draw_rows(&self, frame: &mut RenderFrame<'_>, surface: &mut dyn RenderSurface) -> bool {
        let window = frame.selection.visible_window(frame.listing.len());
        let rows = std::mem::take(&mut frame.dirty.rows);

        let mut drawn = false;
        for index in rows.into_iter().filter(|i| window.contains(i)) {
            self.draw_row(frame, surface, index - window.start, index);
            drawn = true;
        }
        drawn
    }

    fn draw_row(
        &self,
        frame: &mut RenderFrame<'_>,
        surface: &mut dyn RenderSurface,
        row: usize,
        index: usize,
    ) {
        let rect = frame.layout.row_rect(row);
        let Some(entry) = frame.listing.get(index) else {
            surface.fill_rect(rect, self.theme.background);
            return;
        };
        let selected = frame.selection.selected() == Some(index);

        let (background, text_color) = if selected {
            (self.theme.selected_background, self.theme.selected_text)
        } else {
            (self.theme.background, self.theme.text)
        };
        surface.fill_rect(rect, background);

        let icon = frame.icons.icon_for(index, entry, selected, frame.resolver);
        let icon_y = rect.y + (rect.h - icon.height() as i32) / 2;
        surface.blit(rect.x + 2, icon_y, icon);

        let text_x = rect.x + 6 + frame.icons.icon_size() as i32;
        let text_y = rect.y + (rect.h - GLYPH_HEIGHT) / 2;
        surface.draw_text(text_x, text_y, &entry.name, text_color, rect);
    }

    fn draw_info(&self, frame: &RenderFrame<'_>, surface: &mut dyn RenderSurface) {
        let rect = frame.layout.info;
        surface.fill_rect(rect, self.theme.panel);
        surface.fill_rect(Rect::new(rect.x, rect.y, rect.w, 1), self.theme.border);

        let x = rect.x + 4;
        let first = rect.y + 2;
        let second = rect.y + 3 + GLYPH_HEIGHT + 2;

        let selected = frame.selection.selected().and_then(|i| frame.listing.get(i));
        match selected {
            Some(entry) => {
                surface.draw_text(x, first, &entry.name, self.theme.text, rect);
                let details = frame.icons.details(entry, frame.resolver);
                surface.draw_text(x, second, &details, self.theme.text, rect);
            }
            None => {
                let count = frame.listing.iter().filter(|e| !e.is_parent()).count();
                let summary = match count {
                    1 => "1 item".to_string(),
                    n => format!("{} items", n),
                };
                surface.draw_text(x, first, &summary, self.theme.text, rect);
                if let Some(pending) = frame.pending {
                    let line = format!("{}: {}", pending.mode.label(), pending.name());
                    surface.draw_text(x, second, &line, self.theme.text, rect);
                }
            }
        }
    }

    fn draw_command_bar(&self, frame: &RenderFrame<'_>, surface: &mut dyn RenderSurface) {
        surface.fill_rect(frame.layout.info, self.theme.panel);

        for button in frame.commands.buttons() {
            let fill = if button.command == Command::Paste && frame.pending.is_some() {
                self.theme.accent
            } else {
                self.theme.button
            };
            let r = button.rect;
            let inner = Rect::new(r.x + 1, r.y + 1, r.w - 2, r.h - 2);
            surface.fill_rect(inner, fill);
            self.stroke_rect(surface, inner, self.theme.border);
            self.centered_label(surface, inner, button.command.label(), self.theme.text);
        }
    }

    fn draw_dialog(&self, frame: &RenderFrame<'_>, surface: &mut dyn RenderSurface) {
        let app_core::OperationState::ConfirmDelete { name, .. } = frame.state else {
            return;
        };
        let dialog = frame.layout.dialog();
        surface.fill_rect(dialog, self.theme.panel);
        self.stroke_rect(surface, dialog, self.theme.border);

        let (x, _) = self.text_origin(dialog);
        surface.draw_text(x, dialog.y + 6, &format!("Delete {}?", name), self.theme.text, dialog);

        let (yes, no) = frame.layout.dialog_buttons();
        for (rect, label) in [(yes, "Yes"), (no, "No")] {
            surface.fill_rect(rect, self.theme.button);
            self.stroke_rect(surface, rect, self.theme.border);
            self.centered_label(surface, rect, label, self.theme.text);
        }
    }

    fn draw_status(&self, frame: &RenderFrame<'_>, surface: &mut dyn RenderSurface) {
        let rect = frame.layout.status;
        surface.fill_rect(rect, self.theme.background);

        if let Some(status) = frame.status {
            let (x, y) = self.text_origin(rect);
            let color = self.theme.status_color(status.level);
            surface.draw_text(x, y, &status.text, color, rect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::FrameBuffer;
    use app_core::{AppConfig, ApplicationContext, Button, InputSnapshot};
    use app_fs::MemoryFileSystem;

    /// Surface that records which rectangles were filled
    #[derive(Default)]
    struct FillLog {
        fills: Vec<Rect>,
    }

    impl RenderSurface for FillLog {
        fn size(&self) -> (u32, u32) {
            (256, 192)
        }

        fn fill_rect(&mut self, rect: Rect, _color: Color) {
            self.fills.push(rect);
        }

        fn draw_text(&mut self, _x: i32, _y: i32, _text: &str, _color: Color, _clip: Rect) {}

        fn blit(&mut self, _x: i32, _y: i32, _bitmap: &app_core::Bitmap) {}
    }

    fn context() -> ApplicationContext {
        let mut fs = MemoryFileSystem::new();
        fs.add_dir("/root/Documents")
            .add_file("/root/notes.fx2", 120)
            .add_file("/root/temp.log", 2048)
            .add_file("/root/zzz.txt", 7);
        let mut config = AppConfig::default();
        config.general.start_dir = Some("/root".into());

        let mut ctx = ApplicationContext::new(config, Box::new(fs));
        ctx.activate().unwrap();
        ctx
    }

    fn tap_row(ctx: &mut ApplicationContext, row: usize) {
        let rect = ctx.layout().row_rect(row);
        ctx.tick(&InputSnapshot::tap(rect.x + 40, rect.y + 2)).unwrap();
    }

    fn tap_rect(ctx: &mut ApplicationContext, rect: Rect) {
        ctx.tick(&InputSnapshot::tap(rect.x + 2, rect.y + 2)).unwrap();
    }

    #[test]
    fn test_first_frame_draws_everything() {
        let mut ctx = context();
        let mut fb = FrameBuffer::new(256, 192);
        let mut renderer = Renderer::default();

        assert!(renderer.render(ctx.frame(), &mut fb));
        let layout = ctx.layout().clone();
        assert_eq!(fb.text_in(layout.path), vec!["/root"]);
        assert_eq!(
            fb.text_in(layout.list),
            vec!["..", "Documents", "notes.fx2", "temp.log", "zzz.txt"]
        );
        assert_eq!(fb.text_in(layout.info), vec!["4 items"]);

        assert!(!renderer.render(ctx.frame(), &mut fb));
        assert_eq!(renderer.frames(), 1);
    }

    #[test]
    fn test_redraw_is_idempotent() {
        let mut ctx = context();
        tap_row(&mut ctx, 3);
        let mut fb = FrameBuffer::new(256, 192);
        let mut renderer = Renderer::default();

        renderer.render(ctx.frame(), &mut fb);
        let first = fb.image().clone();
        let first_runs = fb.text_runs().len();

        ctx.redraw_all();
        renderer.render(ctx.frame(), &mut fb);
        assert_eq!(fb.image(), &first);
        assert_eq!(fb.text_runs().len(), first_runs);
    }

    #[test]
    fn test_selection_redraws_only_two_rows() {
        let mut ctx = context();
        let mut renderer = Renderer::default();
        tap_row(&mut ctx, 1);
        renderer.render(ctx.frame(), &mut FillLog::default());

        tap_row(&mut ctx, 3);
        let mut log = FillLog::default();
        renderer.render(ctx.frame(), &mut log);

        let layout = ctx.layout();
        assert!(log.fills.contains(&layout.row_rect(1)));
        assert!(log.fills.contains(&layout.row_rect(3)));
        assert!(!log.fills.contains(&layout.list));
        assert!(!log.fills.contains(&layout.row_rect(2)));
        assert!(log.fills.contains(&layout.info));
    }

    #[test]
    fn test_selected_row_uses_selection_colours() {
        let mut ctx = context();
        tap_row(&mut ctx, 3);
        let mut fb = FrameBuffer::new(256, 192);
        let mut renderer = Renderer::default();
        renderer.render(ctx.frame(), &mut fb);

        let theme = renderer.theme().clone();
        let selected = fb.text_runs().iter().find(|r| r.text == "temp.log").unwrap();
        assert_eq!(selected.color, theme.selected_text);
        let plain = fb.text_runs().iter().find(|r| r.text == "zzz.txt").unwrap();
        assert_eq!(plain.color, theme.text);

        let info = fb.text_in(ctx.layout().info);
        assert_eq!(info[0], "temp.log");
        assert!(info[1].starts_with("File"));
    }

    #[test]
    fn test_command_bar_and_dialog() {
        let mut ctx = context();
        let mut fb = FrameBuffer::new(256, 192);
        let mut renderer = Renderer::default();

        tap_row(&mut ctx, 3);
        ctx.tick(&InputSnapshot::press(Button::Select)).unwrap();
        renderer.render(ctx.frame(), &mut fb);
        assert_eq!(
            fb.text_in(ctx.layout().info),
            vec!["Copy", "Cut", "Paste", "Rename", "Delete"]
        );

        let delete = ctx.commands().rect_of(Command::Delete).unwrap();
        tap_rect(&mut ctx, delete);
        renderer.render(ctx.frame(), &mut fb);
        let dialog = fb.text_in(ctx.layout().dialog());
        assert_eq!(dialog, vec!["Delete temp.log?", "Yes", "No"]);

        // cancelling restores the list under the dialog
        ctx.tick(&InputSnapshot::press(Button::X)).unwrap();
        renderer.render(ctx.frame(), &mut fb);
        assert!(fb.text_in(ctx.layout().dialog()).iter().all(|t| !t.starts_with("Delete")));
        assert_eq!(fb.text_in(ctx.layout().info)[0], "temp.log");
    }

    #[test]
    fn test_status_line_colour_and_expiry() {
        let mut ctx = context();
        let mut fb = FrameBuffer::new(256, 192);
        let mut renderer = Renderer::default();

        ctx.tick(&InputSnapshot::press(Button::Select)).unwrap();
        let paste = ctx.commands().rect_of(Command::Paste).unwrap();
        tap_rect(&mut ctx, paste);
        renderer.render(ctx.frame(), &mut fb);

        let status = ctx.layout().status;
        assert_eq!(fb.text_in(status), vec!["Nothing to paste"]);
        assert_eq!(fb.text_runs().last().map(|r| r.color), Some(renderer.theme().error));

        for _ in 0..180 {
            ctx.tick(&InputSnapshot::idle()).unwrap();
            renderer.render(ctx.frame(), &mut fb);
        }
        assert!(fb.text_in(status).is_empty());
    }

    #[test]
    fn test_long_path_keeps_tail() {
        let mut fs = MemoryFileSystem::new();
        let deep = "/a_rather_long_directory_name/and_another_long_one/deeper_still/final";
        fs.add_dir(deep);
        let mut config = AppConfig::default();
        config.general.start_dir = Some(deep.into());
        let mut ctx = ApplicationContext::new(config, Box::new(fs));
        ctx.activate().unwrap();

        let mut fb = FrameBuffer::new(256, 192);
        Renderer::default().render(ctx.frame(), &mut fb);
        let path = fb.text_in(ctx.layout().path);
        assert!(path[0].starts_with("..."));
        assert!(path[0].ends_with("/final"));
    }
}
