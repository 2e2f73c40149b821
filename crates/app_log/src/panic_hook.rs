//! Panic hook for crash reporting

use backtrace::Backtrace;
use chrono::{DateTime, Local};
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};

/// Install a hook that writes a crash report next to the logs
pub fn init_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let report = render_report(info);
        eprintln!("{}", report);
        tracing::error!(target: "panic", "{}", report);

        match write_report(&crate::log_dir(), Local::now(), &report) {
            Ok(path) => eprintln!("Crash report written to {}", path.display()),
            Err(e) => eprintln!("Failed to write crash report: {}", e),
        }
    }));
    tracing::debug!("Panic hook initialized");
}

fn render_report(info: &PanicHookInfo) -> String {
    let payload = info
        .payload()
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| info.payload().downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "<non-string payload>".to_string());

    let location = info
        .location()
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
        .unwrap_or_else(|| "<unknown>".to_string());

    format!(
        "Candle crash report\n\
         time:     {}\n\
         thread:   {}\n\
         location: {}\n\
         message:  {}\n\n{:?}",
        Local::now().to_rfc3339(),
        std::thread::current().name().unwrap_or("<unnamed>"),
        location,
        payload,
        Backtrace::new()
    )
}

/// Path of the crash report for `at` inside `dir`
fn report_path(dir: &Path, at: DateTime<Local>) -> PathBuf {
    dir.join(format!("candle_crash_{}.txt", at.format("%Y%m%d_%H%M%S")))
}

/// Write `report` into `dir`, falling back to the temp directory
fn write_report(dir: &Path, at: DateTime<Local>, report: &str) -> std::io::Result<PathBuf> {
    let primary = std::fs::create_dir_all(dir).and_then(|_| {
        let path = report_path(dir, at);
        std::fs::write(&path, report).map(|_| path)
    });

    primary.or_else(|_| {
        let path = report_path(&std::env::temp_dir(), at);
        std::fs::write(&path, report).map(|_| path)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_report_path_is_timestamped() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let path = report_path(Path::new("/logs"), at);
        assert_eq!(path, PathBuf::from("/logs/candle_crash_20240309_140507.txt"));
    }

    #[test]
    fn test_write_report_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("logs");

        let path = write_report(&nested, Local::now(), "boom").unwrap();
        assert!(path.starts_with(&nested));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "boom");
    }
}
