use crate::config::ImageLimits;
use crate::models::Mode;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("at least {min} images are required, {count} selected")]
    TooFew { count: usize, min: usize },
    #[error("at most {max} images are allowed, {count} selected")]
    TooMany { count: usize, max: usize },
    #[error("no analysis mode selected")]
    MissingMode,
}

/// Anything that can sit in the upload list. Filenames identify entries.
pub trait NamedImage {
    fn file_name(&self) -> String;
}

/// Ordered list of picked images, unique by filename.
#[derive(Debug)]
pub struct ImageSelection<T> {
    items: Vec<T>,
}

impl<T> Default for ImageSelection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: NamedImage> ImageSelection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the images whose names are not already present, in order.
    /// Returns how many were added.
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, incoming: I) -> usize {
        let mut seen: HashSet<String> = self.items.iter().map(NamedImage::file_name).collect();
        let before = self.items.len();
        for item in incoming {
            if seen.insert(item.file_name()) {
                self.items.push(item);
            } else {
                log::debug!("Skipping duplicate image: {}", item.file_name());
            }
        }
        self.items.len() - before
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// The mode to submit with, or why submission must stay disabled.
    pub fn validate(&self, mode: Option<Mode>, limits: ImageLimits) -> Result<Mode, SelectionError> {
        let count = self.items.len();
        if count < limits.min {
            return Err(SelectionError::TooFew { count, min: limits.min });
        }
        if count > limits.max {
            return Err(SelectionError::TooMany { count, max: limits.max });
        }
        mode.ok_or(SelectionError::MissingMode)
    }

    pub fn can_submit(&self, mode: Option<Mode>, limits: ImageLimits) -> bool {
        self.validate(mode, limits).is_ok()
    }
}

/// The line under the picker describing the current count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountHint {
    Empty,
    OutOfRange { count: usize, limits: ImageLimits },
    Ready { count: usize },
}

impl CountHint {
    pub fn for_count(count: usize, limits: ImageLimits) -> Self {
        if count == 0 {
            CountHint::Empty
        } else if limits.contains(count) {
            CountHint::Ready { count }
        } else {
            CountHint::OutOfRange { count, limits }
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, CountHint::OutOfRange { .. })
    }

    pub fn text(&self) -> String {
        match self {
            CountHint::Empty => "ยังไม่ได้เลือกไฟล์".to_string(),
            CountHint::OutOfRange { count, limits } => format!(
                "ต้องเลือก {} - {} ภาพ! (คุณเลือก {} ภาพ)",
                limits.min, limits.max, count
            ),
            CountHint::Ready { count } => format!("เลือกแล้ว {} ภาพ", count),
        }
    }
}
