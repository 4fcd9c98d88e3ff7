use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown on stderr while the engine builds; hidden when stderr is
/// not a terminal.
pub struct BuildProgress {
    progress_bar: ProgressBar,
}

impl BuildProgress {
    pub fn new(image: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
        {
            pb.set_style(style);
        }
        pb.set_message(format!("Building {}...", image));
        pb.enable_steady_tick(std::time::Duration::from_millis(120));

        Self { progress_bar: pb }
    }

    /// Show the latest build step, trimmed to a single line
    pub fn set_step(&self, line: &str) {
        let line = line.trim();
        if !line.is_empty() {
            self.progress_bar.set_message(line.to_string());
        }
    }

    pub fn finish_success(&self) {
        self.progress_bar.finish_and_clear();
    }

    pub fn finish_error(&self, error: &str) {
        self.progress_bar
            .abandon_with_message(format!("Build failed: {}", error));
    }
}
