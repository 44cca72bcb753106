//! Panic hook for crash reporting

use backtrace::Backtrace;
use chrono::Local;
use std::any::Any;
use std::panic::PanicHookInfo;

/// Initialize the panic hook for crash reporting
pub fn init_panic_hook() {
    std::panic::set_hook(Box::new(panic_handler));
    tracing::debug!("Panic hook initialized");
}

/// Panic message, whether raised with a literal or a formatted string
pub fn payload_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<unknown>")
}

/// What the process was doing when it went down
#[derive(Debug)]
pub struct CrashReport {
    pub timestamp: String,
    pub thread: String,
    pub location: String,
    pub message: String,
    pub working_dir: String,
    pub command_line: String,
}

impl CrashReport {
    fn capture(info: &PanicHookInfo) -> Self {
        Self {
            timestamp: Local::now().to_rfc3339(),
            thread: std::thread::current().name().unwrap_or("<unnamed>").to_string(),
            location: info
                .location()
                .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
                .unwrap_or_else(|| "<unknown>".to_string()),
            message: payload_message(info.payload()).to_string(),
            working_dir: std::env::current_dir()
                .map(|d| d.display().to_string())
                .unwrap_or_else(|e| format!("<unavailable: {}>", e)),
            command_line: std::env::args().collect::<Vec<_>>().join(" "),
        }
    }

    /// Report text without the stack trace
    pub fn summary(&self) -> String {
        format!(
            "pocket_filer crashed at {}\n\
             {} (thread {})\n\
             at {}\n\
             cwd: {}\n\
             run as: {}",
            self.timestamp,
            self.message,
            self.thread,
            self.location,
            self.working_dir,
            self.command_line
        )
    }
}

fn panic_handler(info: &PanicHookInfo) {
    let crash = CrashReport::capture(info);
    let report = format!("{}\n\nbacktrace:\n{:?}", crash.summary(), Backtrace::new());

    eprintln!("{}", report);
    tracing::error!(
        thread = %crash.thread,
        location = %crash.location,
        cwd = %crash.working_dir,
        "panic: {}",
        crash.message
    );

    let dump_path = std::env::temp_dir().join(format!(
        "pocket_filer_crash_{}.txt",
        Local::now().format("%Y%m%d_%H%M%S")
    ));
    match std::fs::write(&dump_path, &report) {
        Ok(()) => eprintln!("Crash report written to {}", dump_path.display()),
        Err(e) => eprintln!("Failed to write crash dump: {}", e),
    }
}
