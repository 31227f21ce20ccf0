//! Workflow commands understood by the GitHub Actions log viewer.

/// Collapsible log section; closed when dropped.
pub struct LogGroup;

impl LogGroup {
    pub fn start(title: &str) -> Self {
        println!("::group::{}", escape_data(title));
        Self
    }
}

impl Drop for LogGroup {
    fn drop(&mut self) {
        println!("::endgroup::");
    }
}

/// Emit an error annotation marking the run as failed.
///
/// The process exit code is what actually fails the step; see `main`.
pub fn set_failed(message: &str) {
    println!("::error::{}", escape_data(message));
}

fn escape_data(text: &str) -> String {
    text.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
