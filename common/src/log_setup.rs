use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, Naming};

pub fn setup_logging(base_level: &str) {
    Logger::try_with_str(base_level)
        .unwrap_or_else(|e| panic!("Logger initialization failed with {}", e))
        .log_to_file(
            FileSpec::default()
                .directory("logs")
                .basename("wingcut"),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .duplicate_to_stdout(Duplicate::All)
        .rotate(
            Criterion::Size(1024 * 1024), //1MB
            Naming::Timestamps,
            Cleanup::KeepLogFiles(5),
        )
        .start()
        .unwrap_or_else(|e| panic!("Logger initialization failed with {}", e));
}
