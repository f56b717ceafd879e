use std::sync::LazyLock;

use regex::Regex;

/// ESC `[`, optional numeric parameters, then a color (`m`), cursor move
/// (`G`) or erase-line (`K`) command.
static ANSI_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mGK]").expect("ANSI escape pattern is valid"));

/// Strip terminal color and cursor escape sequences from scanner output.
///
/// Removal is repeated until nothing matches, since deleting one sequence can
/// join the pieces of another (`"\x1B\x1B[0m[0m"`). The result is therefore a
/// fixed point and `strip_ansi(strip_ansi(s)) == strip_ansi(s)`.
pub fn strip_ansi(input: &str) -> String {
    let mut current = input.to_string();
    while ANSI_ESCAPE.is_match(&current) {
        current = ANSI_ESCAPE.replace_all(&current, "").into_owned();
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_color_codes() {
        let input = "\x1B[1;32m[+]\x1B[0m Potential CL.TE Vulnerability Found (nameprefix1)";
        assert_eq!(strip_ansi(input), "[+] Potential CL.TE Vulnerability Found (nameprefix1)");
    }

    #[test]
    fn test_strips_cursor_and_erase() {
        assert_eq!(strip_ansi("\x1B[2Kscanning\x1B[0G"), "scanning");
        assert_eq!(strip_ansi("\x1B[K"), "");
    }

    #[test]
    fn test_leaves_other_sequences() {
        // Cursor-up (`A`) is not in the stripped set.
        assert_eq!(strip_ansi("\x1B[1Aline"), "\x1B[1Aline");
        assert_eq!(strip_ansi("plain [text] 100%"), "plain [text] 100%");
    }

    #[test]
    fn test_nested_sequence_fully_removed() {
        assert_eq!(strip_ansi("a\x1B\x1B[0m[31mb"), "ab");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "no escapes here",
            "\x1B[31mred\x1B[0m and \x1B[1;4mbold\x1B[m",
            "a\x1B\x1B[0m[31mb",
            "\x1B\x1B\x1B[m[m[mc",
            "trailing \x1B[",
            "unicode ✓ \x1B[32mok\x1B[0m",
        ];
        for sample in samples {
            let once = strip_ansi(sample);
            assert_eq!(strip_ansi(&once), once, "not idempotent for {sample:?}");
        }
    }
}
