use std::ops::Deref;
use std::panic;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::LevelFilter;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

const LOG_FILE_NAME: &str = "gridsnake.log";

/// The game owns the terminal, so logs go to a file in the temp dir.
pub fn log_file() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

pub fn setup(debug: bool) -> Result<()> {
    panic::set_hook(Box::new(|panic_info| {
        let (filename, line) = panic_info
            .location()
            .map(|loc| (loc.file(), loc.line()))
            .unwrap_or(("<unknown>", 0));

        let cause = panic_info
            .payload()
            .downcast_ref::<String>()
            .map(String::deref)
            .or_else(|| panic_info.payload().downcast_ref::<&str>().copied())
            .unwrap_or("<cause unknown>");

        log::error!("A panic occurred at {}:{}: {}", filename, line, cause);
    }));

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{l} {d(%H:%M:%S.%3f)} {f}:{L} {m}{n}",
        )))
        .build(log_file())
        .context("failed to open log file")?;

    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let config = Config::builder()
        .appender(Appender::builder().build("file-appender", Box::new(file_appender)))
        .build(Root::builder().appender("file-appender").build(level))
        .context("invalid log configuration")?;

    log4rs::init_config(config).context("failed to install logger")?;
    Ok(())
}
