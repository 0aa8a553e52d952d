//! Display helpers shared by the GUI and the CLI.

use chrono::{DateTime, Local, TimeZone};
use std::fmt;

use crate::model::Node;

/// Coarse classification of a MIME type, used to pick an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Pdf,
    Document,
    Text,
    Other,
}

impl FileKind {
    pub fn from_mime(mime: Option<&str>) -> Self {
        let Some(mime) = mime else {
            return FileKind::Other;
        };
        if mime.contains("image") {
            FileKind::Image
        } else if mime == "application/pdf" {
            FileKind::Pdf
        } else if mime.contains("document") || mime.contains("msword") {
            FileKind::Document
        } else if mime == "text/plain" {
            FileKind::Text
        } else {
            FileKind::Other
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            FileKind::Image => "🖼️",
            FileKind::Pdf => "📕",
            FileKind::Document => "📘",
            FileKind::Text => "📝",
            FileKind::Other => "📄",
        }
    }
}

pub fn icon_for(node: &Node) -> &'static str {
    if node.is_folder {
        "📁"
    } else {
        FileKind::from_mime(node.file_type.as_deref()).icon()
    }
}

pub fn format_size(size: u64) -> String {
    let mut size = size as f64;
    for unit in ["B", "KB", "MB", "GB", "TB"] {
        if size < 1024.0 {
            return format!("{size:.2} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.2} PB")
}

/// Formats a timestamp as `Mar 05, 2024 1:07 PM` in the timestamp's zone.
pub fn format_date<Tz>(date: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    date.format("%b %d, %Y %-I:%M %p").to_string()
}

/// Secondary line of a list row: item count or size, then creation date.
pub fn describe(node: &Node) -> String {
    let head = if node.is_folder {
        format!("{} items", node.child_count)
    } else {
        node.display_size()
    };
    match created_label(node) {
        Some(created) => format!("{head} • {created}"),
        None => head,
    }
}

/// Creation date in local time, if the service sent one.
pub fn created_label(node: &Node) -> Option<String> {
    node.created_at
        .as_ref()
        .map(|created| format_date(&created.with_timezone(&Local)))
}

/// Type column of the details panel.
pub fn type_label(node: &Node) -> String {
    if node.is_folder {
        "Folder".to_string()
    } else {
        node.file_type
            .clone()
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

/// Size column of the details panel.
pub fn size_label(node: &Node) -> String {
    if node.is_folder {
        format!("{} items", node.child_count)
    } else {
        node.display_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_file_kind_classification() {
        assert_eq!(FileKind::from_mime(Some("image/png")), FileKind::Image);
        assert_eq!(FileKind::from_mime(Some("application/pdf")), FileKind::Pdf);
        assert_eq!(
            FileKind::from_mime(Some(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            )),
            FileKind::Document
        );
        assert_eq!(FileKind::from_mime(Some("application/msword")), FileKind::Document);
        assert_eq!(FileKind::from_mime(Some("text/plain")), FileKind::Text);
        assert_eq!(FileKind::from_mime(Some("text/html")), FileKind::Other);
        assert_eq!(FileKind::from_mime(None), FileKind::Other);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.00 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 13, 7, 0).unwrap();
        assert_eq!(format_date(&date), "Mar 05, 2024 1:07 PM");

        let midnight = Utc.with_ymd_and_hms(2023, 12, 31, 0, 5, 0).unwrap();
        assert_eq!(format_date(&midnight), "Dec 31, 2023 12:05 AM");
    }

    #[test]
    fn test_describe_without_date() {
        let mut folder = Node::folder("d1", "Docs");
        folder.child_count = 3;
        assert_eq!(describe(&folder), "3 items");

        let file = Node::file("f1", "a.txt", "text/plain", 2048);
        assert_eq!(describe(&file), "2.00 KB");
        assert_eq!(type_label(&file), "text/plain");
        assert_eq!(size_label(&folder), "3 items");
    }
}
