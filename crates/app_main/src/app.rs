//! Console host: feeds script input to the core one tick at a time and
//! renders every tick into an off-screen frame buffer

use crate::script::{parse_line, ScriptCommand};
use anyhow::{anyhow, Result};
use app_core::{
    AppConfig, ApplicationContext, ButtonSet, ExtensionResolver, FileOpener, InputSnapshot, Rect,
    TickOutcome,
};
use app_fs::{FileSystem, MemoryFileSystem};
use app_ui::{FrameBuffer, Renderer, Theme};
use std::io::{BufRead, Write};
use std::path::Path;

/// Opens files with the desktop's default application
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl FileOpener for SystemOpener {
    fn open_file(&mut self, path: &Path) {
        if let Err(e) = open::that_detached(path) {
            tracing::warn!("Failed to open {}: {}", path.display(), e);
        }
    }
}

/// Sample tree for `--demo`
pub fn demo_filesystem() -> MemoryFileSystem {
    let mut fs = MemoryFileSystem::new();
    fs.add_dir("/root/Documents")
        .add_file("/root/Documents/letter.txt", 1_530)
        .add_file("/root/Documents/todo.md", 312)
        .add_dir("/root/Locked")
        .deny_scan("/root/Locked")
        .add_file("/root/notes.fx2", 48_200)
        .add_file("/root/temp.log", 2_048)
        .add_file("/root/readonly.txt", 96)
        .deny_remove("/root/readonly.txt")
        .add_file("/root/zzz.txt", 7)
        .add_file("/root/.config", 10);
    for i in 1..=20 {
        fs.add_file(format!("/root/Music/track{:02}.wav", i), 1_000_000 + i * 4_096);
    }
    fs
}

/// Host state
pub struct App {
    ctx: ApplicationContext,
    renderer: Renderer,
    framebuffer: FrameBuffer,
    ticks: u64,
}

impl App {
    pub fn new(config: AppConfig, fs: Box<dyn FileSystem>, opener: Box<dyn FileOpener>) -> Self {
        let (width, height) = (config.layout.screen_width, config.layout.screen_height);
        let ctx = ApplicationContext::new(config, fs)
            .with_resolver(Box::new(ExtensionResolver::with_defaults()))
            .with_opener(opener);

        Self {
            ctx,
            renderer: Renderer::new(Theme::default()),
            framebuffer: FrameBuffer::new(width, height),
            ticks: 0,
        }
    }

    pub fn activate(&mut self) -> Result<()> {
        self.ctx.activate()?;
        self.renderer.render(self.ctx.frame(), &mut self.framebuffer);
        Ok(())
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    pub fn context(&self) -> &ApplicationContext {
        &self.ctx
    }

    /// Run one tick and render it
    fn step(&mut self, input: InputSnapshot) -> Result<TickOutcome> {
        let outcome = self
            .ctx
            .tick(&input)
            .map_err(|e| anyhow!("Fatal error on tick {}: {}", self.ticks, e))?;
        self.ticks += 1;

        if outcome == TickOutcome::Continue {
            self.renderer.render(self.ctx.frame(), &mut self.framebuffer);
        }
        Ok(outcome)
    }

    fn tap_center(&mut self, rect: Rect) -> Result<TickOutcome> {
        self.step(InputSnapshot::tap(rect.x + rect.w / 2, rect.y + rect.h / 2))
    }

    fn execute<W: Write>(&mut self, command: ScriptCommand, out: &mut W) -> Result<TickOutcome> {
        match command {
            ScriptCommand::Press(button) => self.step(InputSnapshot::press(button)),
            ScriptCommand::Hold(button, ticks) => {
                let mut outcome = self.step(InputSnapshot::press(button))?;
                let held = InputSnapshot {
                    repeat: ButtonSet::empty().with(button),
                    ..InputSnapshot::idle()
                };
                for _ in 1..ticks {
                    if outcome == TickOutcome::Exit {
                        break;
                    }
                    outcome = self.step(held)?;
                }
                Ok(outcome)
            }
            ScriptCommand::Tap(x, y) => self.step(InputSnapshot::tap(x, y)),
            ScriptCommand::Row(row) => {
                let rect = self.ctx.layout().row_rect(row);
                self.tap_center(rect)
            }
            ScriptCommand::Command(command) => match self.ctx.commands().rect_of(command) {
                Some(rect) => self.tap_center(rect),
                None => Ok(TickOutcome::Continue),
            },
            ScriptCommand::Wait(ticks) => {
                for _ in 0..ticks {
                    if self.step(InputSnapshot::idle())? == TickOutcome::Exit {
                        return Ok(TickOutcome::Exit);
                    }
                }
                Ok(TickOutcome::Continue)
            }
            ScriptCommand::Show => {
                self.print_screen(out)?;
                Ok(TickOutcome::Continue)
            }
            ScriptCommand::Quit => Ok(TickOutcome::Exit),
        }
    }

    /// Read commands until EOF, quit or the back button
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        self.print_screen(out)?;

        for line in input.lines() {
            let line = line?;
            let command = match parse_line(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    writeln!(out, "? {}", e)?;
                    continue;
                }
            };

            if self.execute(command, out)? == TickOutcome::Exit {
                break;
            }
        }

        tracing::info!("Host stopped after {} ticks", self.ticks);
        Ok(())
    }

    /// Print what the frame buffer currently shows
    pub fn print_screen<W: Write>(&self, out: &mut W) -> Result<()> {
        let layout = self.ctx.layout();
        let fb = &self.framebuffer;
        let selection = self.ctx.selection();

        writeln!(out, "[{}]", fb.text_in(layout.path).join(" "))?;
        for row in 0..layout.visible_rows {
            let Some(name) = fb.text_in(layout.row_rect(row)).first().copied() else {
                continue;
            };
            let marker = if selection.selected() == Some(selection.scroll_offset() + row) {
                '>'
            } else {
                ' '
            };
            writeln!(out, "{} {}", marker, name)?;
        }
        if self.ctx.state().shows_dialog() {
            writeln!(out, "<< {} >>", fb.text_in(layout.dialog()).join(" | "))?;
        }
        writeln!(out, "-- {}", fb.text_in(layout.info).join(" | "))?;

        let status = fb.text_in(layout.status);
        if !status.is_empty() {
            writeln!(out, "!! {}", status.join(" "))?;
        }
        out.flush()?;
        Ok(())
    }
}
