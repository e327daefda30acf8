//! Console line vocabulary for the RWR server
//!
//! The server prefixes every console line with `>`. During boot, and again
//! while a package script loads, it emits `Loading ...` progress lines and
//! closes each cycle with the exact line `Game loaded`. After the boot cycle
//! it emits one bare `>` as its interactive prompt.

/// Prompt marker prefixed to every console line (and emitted bare once after boot)
pub const PROMPT_MARKER: u8 = b'>';

/// Prefix of progress lines emitted while the server loads
pub const LOADING_PREFIX: &str = "Loading";

/// Exact line marking the end of a load cycle
pub const LOAD_COMPLETE: &str = "Game loaded";

/// Strip leading prompt markers and surrounding whitespace from a raw console line
pub fn strip_prompt(raw: &str) -> &str {
    raw.trim_start_matches('>').trim()
}

/// What a console line means to the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleLine {
    /// Load-progress line, not forwarded
    Loading,
    /// Load cycle finished
    Loaded,
    /// Anything else, forwarded verbatim
    Output(String),
}

/// Classify a raw console line
pub fn classify(raw: &str) -> ConsoleLine {
    let stripped = strip_prompt(raw);
    if stripped.starts_with(LOADING_PREFIX) {
        ConsoleLine::Loading
    } else if stripped == LOAD_COMPLETE {
        ConsoleLine::Loaded
    } else {
        ConsoleLine::Output(stripped.to_string())
    }
}

/// Format the console command that starts a package script
pub fn start_script_command(script: &str, package_path: &str) -> String {
    format!("start_script {} {}", script, package_path)
}

const SPINNER_GLYPHS: [char; 4] = ['/', '-', '\\', '|'];

/// Rotating progress indicator shown while the server loads
#[derive(Debug, Default)]
pub struct Spinner {
    step: usize,
}

impl Spinner {
    /// Create a spinner at its first glyph
    pub fn new() -> Self {
        Self::default()
    }

    /// Next glyph in the `/ - \ |` cycle
    pub fn next_glyph(&mut self) -> char {
        let glyph = SPINNER_GLYPHS[self.step % SPINNER_GLYPHS.len()];
        self.step += 1;
        glyph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_prompt() {
        assert_eq!(strip_prompt(">Loading map\n"), "Loading map");
        assert_eq!(strip_prompt(">>nested\n"), "nested");
        assert_eq!(strip_prompt("no marker"), "no marker");
        assert_eq!(strip_prompt(">  spaced  \n"), "spaced");
    }

    #[test]
    fn test_classify_loading() {
        assert_eq!(classify(">Loading map terrain\n"), ConsoleLine::Loading);
        assert_eq!(classify(">Loading\n"), ConsoleLine::Loading);
    }

    #[test]
    fn test_classify_loaded_is_exact() {
        assert_eq!(classify(">Game loaded\n"), ConsoleLine::Loaded);
        // near-misses are ordinary output
        assert_eq!(
            classify(">Game loaded!\n"),
            ConsoleLine::Output("Game loaded!".to_string())
        );
    }

    #[test]
    fn test_classify_output() {
        assert_eq!(
            classify(">1 player connected\n"),
            ConsoleLine::Output("1 player connected".to_string())
        );
        assert_eq!(classify(">\n"), ConsoleLine::Output(String::new()));
    }

    #[test]
    fn test_spinner_cycles() {
        let mut spinner = Spinner::new();
        let glyphs: Vec<char> = (0..6).map(|_| spinner.next_glyph()).collect();

        assert_eq!(glyphs, vec!['/', '-', '\\', '|', '/', '-']);
    }

    #[test]
    fn test_start_script_command() {
        assert_eq!(
            start_script_command(
                "start_marshalrwr_test.as",
                "media/packages/_marshalrwr_foo_test_pkg"
            ),
            "start_script start_marshalrwr_test.as media/packages/_marshalrwr_foo_test_pkg"
        );
    }
}
