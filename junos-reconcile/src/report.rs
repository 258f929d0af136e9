use colored::Colorize;

/// Render pending-diff text for terminal output.
pub fn render_diff(diff: &str) -> String {
    let mut out = Vec::new();
    for line in diff.lines() {
        let colored = if line.starts_with('+') {
            line.green().to_string()
        } else if line.starts_with('-') {
            line.red().to_string()
        } else if line.starts_with('~') {
            line.yellow().to_string()
        } else {
            line.to_string()
        };
        out.push(colored);
    }
    out.join("\n")
}
