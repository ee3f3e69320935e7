/// Shown before the first status arrives.
pub const INITIAL_MESSAGE: &str = "กำลังเริ่มต้น...";
pub const INITIAL_DETAIL: &str = "กรุณารอสักครู่...";
/// Shown when the backend sends an empty main message.
pub const PROCESSING_FALLBACK: &str = "กำลังประมวลผล...";
pub const RECONNECTING_MESSAGE: &str = "การเชื่อมต่อขัดข้อง...";
pub const RECONNECTING_DETAIL: &str = "กำลังพยายามเชื่อมต่อใหม่";

/// A backend status message split into its headline and trailing
/// parenthesised detail, e.g. `"Extracting faces (batch 3/10)"` becomes
/// `"Extracting faces"` and `"(batch 3/10)"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub message: String,
    pub detail: String,
}

impl StatusLine {
    pub fn initial() -> Self {
        Self {
            message: INITIAL_MESSAGE.to_string(),
            detail: INITIAL_DETAIL.to_string(),
        }
    }

    pub fn reconnecting() -> Self {
        Self {
            message: RECONNECTING_MESSAGE.to_string(),
            detail: RECONNECTING_DETAIL.to_string(),
        }
    }

    /// The detail is the clause opened by the first whitespace-plus-`(`
    /// that runs, non-empty, to a `)` closing the whole message.
    pub fn parse(raw: &str) -> Self {
        if raw.ends_with(')') {
            let close = raw.len() - 1;
            for (idx, ch) in raw.char_indices() {
                if !ch.is_whitespace() {
                    continue;
                }
                let open = idx + ch.len_utf8();
                if raw[open..].starts_with('(') && open + 1 < close {
                    return Self {
                        message: raw[..idx].to_string(),
                        detail: raw[open..].trim().to_string(),
                    };
                }
            }
        }

        Self {
            message: raw.to_string(),
            detail: String::new(),
        }
    }

    /// Same as [`StatusLine::parse`] but never leaves the headline blank.
    pub fn for_display(raw: &str) -> Self {
        let mut line = Self::parse(raw);
        if line.message.is_empty() {
            line.message = PROCESSING_FALLBACK.to_string();
        }
        line
    }
}
