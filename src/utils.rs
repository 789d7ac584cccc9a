/// Shortens `text` so its UTF-16 encoding fits in `max_units` code units,
/// never splitting a character.
pub fn truncate_utf16(text: &str, max_units: usize) -> &str {
    let mut units = 0;
    for (idx, ch) in text.char_indices() {
        units += ch.len_utf16();
        if units > max_units {
            return &text[..idx];
        }
    }
    text
}

/// Copies `text` into a fixed, nul-terminated UTF-16 buffer as used by shell structs.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
pub fn copy_to_wide_buf(dst: &mut [u16], text: &str) {
    let Some(max) = dst.len().checked_sub(1) else {
        return;
    };

    let text = truncate_utf16(text, max);
    let mut len = 0;
    for (slot, unit) in dst.iter_mut().zip(text.encode_utf16()) {
        *slot = unit;
        len += 1;
    }
    dst[len..].fill(0);
}

#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
pub fn encode_wide(text: impl AsRef<std::ffi::OsStr>) -> Vec<u16> {
    #[cfg(target_os = "windows")]
    {
        use std::os::windows::ffi::OsStrExt;
        text.as_ref().encode_wide().chain(Some(0)).collect()
    }

    #[cfg(not(target_os = "windows"))]
    {
        text.as_ref()
            .to_string_lossy()
            .encode_utf16()
            .chain(Some(0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_counts_utf16_units() {
        assert_eq!(truncate_utf16("hello", 10), "hello");
        assert_eq!(truncate_utf16("hello", 3), "hel");
        assert_eq!(truncate_utf16("", 0), "");
    }

    #[test]
    fn truncation_keeps_surrogate_pairs_whole() {
        // the crab is two UTF-16 units
        assert_eq!(truncate_utf16("a🦀b", 2), "a");
        assert_eq!(truncate_utf16("a🦀b", 3), "a🦀");
    }

    #[test]
    fn wide_buf_is_nul_terminated_and_cleared() {
        let mut buf = [0xFFFFu16; 6];
        copy_to_wide_buf(&mut buf, "tooltip text");

        let expected: Vec<u16> = "toolt".encode_utf16().chain(Some(0)).collect();
        assert_eq!(buf.as_slice(), expected.as_slice());

        copy_to_wide_buf(&mut buf, "ab");
        assert_eq!(&buf[..3], &[b'a' as u16, b'b' as u16, 0]);
        assert!(buf[3..].iter().all(|&u| u == 0));
    }

    #[test]
    fn encode_wide_appends_nul() {
        assert_eq!(encode_wide("ok"), [b'o' as u16, b'k' as u16, 0]);
    }
}
