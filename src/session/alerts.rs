// SPDX-License-Identifier: GPL-3.0-only

//! Alert presentation seam
//!
//! A modal alert is a title, an optional message, and labeled actions.
//! How it gets drawn is the screen's business; the terminal screen renders
//! it in the status line.

/// A labeled alert button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertAction {
    pub label: String,
}

impl AlertAction {
    /// The default confirm action
    pub fn ok() -> Self {
        Self {
            label: "OK".to_string(),
        }
    }

    /// The default dismiss action
    pub fn cancel() -> Self {
        Self {
            label: "Cancel".to_string(),
        }
    }
}

/// A modal alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: Option<String>,
    pub actions: Vec<AlertAction>,
}

impl Alert {
    pub fn new(
        title: impl Into<String>,
        message: Option<String>,
        actions: Vec<AlertAction>,
    ) -> Self {
        Self {
            title: title.into(),
            message,
            actions,
        }
    }

    /// Alert shown after a successful export
    pub fn photo_saved(path: &std::path::Path) -> Self {
        Self::new(
            "Image saved successfully!",
            Some(path.display().to_string()),
            vec![AlertAction::ok()],
        )
    }

    /// Alert shown when an export fails
    pub fn save_failed(error: &crate::errors::ExportError) -> Self {
        Self::new(
            "Could not save image",
            Some(error.to_string()),
            vec![AlertAction::ok()],
        )
    }
}

/// Where alerts get presented
pub trait AlertSink {
    fn present(&mut self, alert: Alert);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_alert_has_ok_action() {
        let alert = Alert::photo_saved(std::path::Path::new("/tmp/IMG_1.png"));
        assert_eq!(alert.actions, vec![AlertAction::ok()]);
        assert!(alert.message.unwrap().contains("IMG_1.png"));
    }

    #[test]
    fn test_failure_alert_carries_reason() {
        let err = crate::errors::ExportError::SaveFailed("disk full".to_string());
        let alert = Alert::save_failed(&err);
        assert!(alert.message.unwrap().contains("disk full"));
    }
}
