// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filename sanitization.
//
// One function turns an arbitrary string into a single path component that
// is safe on both Windows and Unix file systems. Non-ASCII letters and digits
// survive so that a stem like "数字图像处理" stays readable on disk.

/// Longest component we produce, in bytes.
pub const MAX_COMPONENT_BYTES: usize = 150;

/// Names Windows reserves for devices, regardless of extension.
const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Sanitize `raw` into a single safe path component.
///
/// - Keeps Unicode letters and digits, `-` and `.`
/// - Keeps combining marks that follow a letter or digit, so decomposed
///   names (`cafe\u{301}` as sent by macOS) keep their accents
/// - Maps separators, whitespace, `_` and every other symbol to `_`
/// - Drops control characters
/// - Collapses runs of `_` and of `.` (so `..` never survives)
/// - Trims leading/trailing `.` and `_`
/// - Prefixes Windows device names (`CON`, `lpt1.pdf`, ...) with `_`
/// - Limits length to [`MAX_COMPONENT_BYTES`]
///
/// Returns an empty string when nothing usable is left. Applying the
/// function to its own output returns the output unchanged.
pub fn sanitize_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());

    for c in raw.chars() {
        if c.is_control() {
            continue;
        }
        let mapped = if c.is_alphanumeric() || c == '-' || c == '.' {
            c
        } else if is_combining_mark(c) && out.chars().next_back().is_some_and(is_mark_base) {
            c
        } else {
            '_'
        };
        match mapped {
            '_' if out.ends_with('_') => {}
            '.' if out.ends_with('.') => {}
            other => out.push(other),
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    let mut name = if is_windows_device_name(trimmed) {
        format!("_{trimmed}")
    } else {
        trimmed.to_owned()
    };

    truncate_at_char_boundary(&mut name, MAX_COMPONENT_BYTES);
    let end = name.trim_end_matches(|c| c == '.' || c == '_').len();
    name.truncate(end);
    name
}

/// Combining diacritics, including the kana voicing marks of decomposed
/// Japanese names.
fn is_combining_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{3099}'..='\u{309A}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}

/// A character a combining mark may attach to.
fn is_mark_base(c: char) -> bool {
    c.is_alphanumeric() || is_combining_mark(c)
}

/// Whether the part before the first `.` is a reserved Windows device name.
fn is_windows_device_name(name: &str) -> bool {
    let head = name.split('.').next().unwrap_or_default();
    WINDOWS_DEVICE_NAMES
        .iter()
        .any(|device| device.eq_ignore_ascii_case(head))
}

fn truncate_at_char_boundary(name: &mut String, max: usize) {
    if name.len() <= max {
        return;
    }
    let mut take = max;
    while take > 0 && !name.is_char_boundary(take) {
        take -= 1;
    }
    name.truncate(take);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_plain_names() {
        assert_eq!(sanitize_component("report-2024.pdf"), "report-2024.pdf");
    }

    #[test]
    fn keeps_non_ascii_letters() {
        assert_eq!(
            sanitize_component("数字图像处理考查内容及评分标准"),
            "数字图像处理考查内容及评分标准"
        );
        assert_eq!(sanitize_component("Übungsblatt 3"), "Übungsblatt_3");
    }

    #[test]
    fn keeps_decomposed_accents() {
        assert_eq!(sanitize_component("cafe\u{301}"), "cafe\u{301}");
        assert_eq!(sanitize_component("re\u{301}sume\u{301} v2"), "re\u{301}sume\u{301}_v2");
        // A mark with nothing to attach to is just another symbol.
        assert_eq!(sanitize_component("\u{301}a"), "a");
        assert_eq!(sanitize_component("a \u{301}b"), "a_b");
    }

    #[test]
    fn removes_traversal_and_separators() {
        assert_eq!(sanitize_component("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_component("..\\..\\Windows\\win.ini"), "Windows_win.ini");
        assert_eq!(sanitize_component("a/../b"), "a_._b");
        assert!(!sanitize_component("x/../../y").contains(".."));
    }

    #[test]
    fn replaces_reserved_characters() {
        assert_eq!(sanitize_component(r#"a<b>c:d"e|f?g*h"#), "a_b_c_d_e_f_g_h");
    }

    #[test]
    fn drops_control_characters() {
        assert_eq!(sanitize_component("file\u{0}name\r\n"), "filename");
    }

    #[test]
    fn collapses_runs() {
        assert_eq!(sanitize_component("a   b___c...d"), "a_b_c.d");
    }

    #[test]
    fn trims_dots_and_underscores() {
        assert_eq!(sanitize_component("  .. hidden ..  "), "hidden");
    }

    #[test]
    fn nothing_usable_yields_empty() {
        assert_eq!(sanitize_component(""), "");
        assert_eq!(sanitize_component("../.."), "");
        assert_eq!(sanitize_component("!!!"), "");
    }

    #[test]
    fn prefixes_windows_device_names() {
        assert_eq!(sanitize_component("CON"), "_CON");
        assert_eq!(sanitize_component("lpt1.pdf"), "_lpt1.pdf");
        assert_eq!(sanitize_component("console"), "console");
    }

    #[test]
    fn limits_length_on_char_boundary() {
        let long = "数".repeat(100); // 300 bytes
        let out = sanitize_component(&long);
        assert!(out.len() <= MAX_COMPONENT_BYTES);
        assert_eq!(out, "数".repeat(50));
    }

    #[test]
    fn sanitizing_twice_changes_nothing() {
        let inputs = [
            "report.pdf",
            "../../etc/passwd",
            "  .. hidden ..  ",
            "CON",
            "__con.pdf",
            "a/../b",
            "数字 图像\\处理",
            "Übungsblatt 3 (final).docx",
            "cafe\u{301} \u{301}menu",
            &format!("con.{}", "x".repeat(300)),
            &"é_".repeat(120),
        ];
        for input in inputs {
            let once = sanitize_component(input);
            assert_eq!(sanitize_component(&once), once, "input {input:?}");
        }
    }
}
