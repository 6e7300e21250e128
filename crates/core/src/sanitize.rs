//! Raw tool output sanitization
//!
//! Host/locale-specific workarounds live here, isolated from the parser:
//! legacy-codepage transcoding on Windows and the known setlocale preamble
//! the shell occasionally injects into the result stream.

use std::io;
use std::path::Path;

/// Locale warning the host shell sometimes prepends to the result stream.
pub const LOCALE_PREAMBLE: &str =
    "/bin/sh: warning: setlocale: LC_ALL: cannot change locale (en_US.UTF-8)\n";

/// Read the raw result file as canonical UTF-8 text with the locale
/// preamble removed.
pub fn read_result_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(strip_locale_preamble(decode_platform(&bytes)))
}

/// Windows builds of the tool emit the legacy ANSI codepage (GBK family).
#[cfg(windows)]
fn decode_platform(bytes: &[u8]) -> String {
    let (text, _, _) = encoding_rs::GBK.decode(bytes);
    text.into_owned()
}

#[cfg(not(windows))]
fn decode_platform(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn strip_locale_preamble(content: String) -> String {
    match content.strip_prefix(LOCALE_PREAMBLE) {
        Some(rest) => rest.to_string(),
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_locale_preamble() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.txt");
        std::fs::write(&path, format!("{LOCALE_PREAMBLE}real content\n")).unwrap();
        assert_eq!(read_result_file(&path).unwrap(), "real content\n");
    }

    #[test]
    fn leaves_clean_content_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.txt");
        std::fs::write(&path, "real content\n").unwrap();
        assert_eq!(read_result_file(&path).unwrap(), "real content\n");
    }

    #[test]
    fn preamble_in_the_middle_is_not_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.txt");
        let content = format!("first\n{LOCALE_PREAMBLE}");
        std::fs::write(&path, &content).unwrap();
        assert_eq!(read_result_file(&path).unwrap(), content);
    }
}
