use crate::error::LabelError;

/// Read a tempo label such as `song_120_bpm.mp3` out of a file name.
///
/// `_<digits>_bpm` is preferred; otherwise the first `<digits>bpm` or
/// `<digits>_bpm` is used. Matching ignores case.
pub fn bpm_from_filename(name: &str) -> Result<u32, LabelError> {
    let lower = name.to_lowercase();

    find_labeled(&lower, true)
        .or_else(|| find_labeled(&lower, false))
        .ok_or_else(|| LabelError::NotFound(name.to_string()))
}

fn find_labeled(text: &str, strict: bool) -> Option<u32> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }

        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let digits = &text[start..i];
        let rest = &text[i..];

        let matched = if strict {
            start > 0 && bytes[start - 1] == b'_' && rest.starts_with("_bpm")
        } else {
            rest.starts_with("bpm") || rest.starts_with("_bpm")
        };
        if matched {
            if let Ok(bpm) = digits.parse() {
                return Some(bpm);
            }
        }
    }
    None
}
