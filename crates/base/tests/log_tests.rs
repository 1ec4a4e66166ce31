use {
    base::{FileLogger, LOGGER, Level, Logger, log_debug, log_info, log_warn, set_max_level},
    std::{
        fs,
        sync::{Arc, Mutex},
    },
};

struct CaptureLogger {
    lines: Arc<Mutex<Vec<(Level, String)>>>,
}

impl Logger for CaptureLogger {
    fn log(&self, level: Level, _file: &str, _line: usize, message: &str) {
        self.lines.lock().unwrap().push((level, message.to_string()));
    }
}

#[test]
fn test_level_ordering() {
    assert!(Level::Debug < Level::Info);
    assert!(Level::Info < Level::Warn);
    assert!(Level::Warn < Level::Error);
    assert!(Level::Error < Level::Fatal);
    assert_eq!(format!("{}", Level::Warn), "WARN");
}

#[test]
fn test_level_from_log_facade() {
    assert_eq!(Level::from(log::Level::Trace), Level::Debug);
    assert_eq!(Level::from(log::Level::Error), Level::Error);
}

#[test]
fn test_file_logger_writes_to_dated_file() {
    let dir = std::env::temp_dir().join(format!("base-log-test-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);

    let logger = FileLogger::new(&dir).expect("Failed to create FileLogger");
    logger.log(Level::Error, "test.rs", 100, "decode failed");

    let entries: Vec<_> = fs::read_dir(&dir)
        .expect("Failed to read test directory")
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(entries.len(), 1, "Should have exactly one log file");
    let name = entries[0].file_name().to_string_lossy().into_owned();
    assert!(name.ends_with(".log"));

    let content = fs::read_to_string(entries[0].path()).expect("Failed to read log file");
    assert!(content.contains("ERROR"));
    assert!(content.contains("test.rs:100"));
    assert!(content.contains("decode failed"));
    assert!(content.ends_with('\n'));

    fs::remove_dir_all(&dir).ok();
}

// the only test in this binary that touches the global logger
#[test]
fn test_macros_filter_and_bridge() {
    let lines = Arc::new(Mutex::new(Vec::new()));
    base::init_stdout_logger();
    LOGGER.lock().unwrap().replace(Box::new(CaptureLogger {
        lines: Arc::clone(&lines),
    }));

    set_max_level(Level::Info);
    log_debug!("hidden {}", 1);
    log_info!("frame {} shown", 2);
    log_warn!("frame {} dropped", 3);
    log::warn!("from the facade");
    set_max_level(Level::Debug);

    let lines = lines.lock().unwrap();
    assert_eq!(
        *lines,
        vec![
            (Level::Info, "frame 2 shown".to_string()),
            (Level::Warn, "frame 3 dropped".to_string()),
            (Level::Warn, "from the facade".to_string()),
        ]
    );
}
