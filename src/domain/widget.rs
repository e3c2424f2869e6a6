// Widget kinds and the static size registry
use serde::{Deserialize, Serialize};

/// Closed set of widget kinds a dashboard item can be.
///
/// Tags the renderer does not know about are kept verbatim in `Other` so a
/// round trip through the store never rewrites them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WidgetKind {
    AppShortcut,
    Group,
    Weather,
    DateTime,
    SystemMonitor,
    DiskMonitor,
    TorrentClient,
    MediaServer,
    DnsBlocker,
    Notes,
    Other(String),
}

impl WidgetKind {
    pub fn as_str(&self) -> &str {
        match self {
            WidgetKind::AppShortcut => "app-shortcut",
            WidgetKind::Group => "group",
            WidgetKind::Weather => "weather",
            WidgetKind::DateTime => "date-time",
            WidgetKind::SystemMonitor => "system-monitor",
            WidgetKind::DiskMonitor => "disk-monitor",
            WidgetKind::TorrentClient => "torrent-client",
            WidgetKind::MediaServer => "media-server",
            WidgetKind::DnsBlocker => "dns-blocker",
            WidgetKind::Notes => "notes",
            WidgetKind::Other(tag) => tag,
        }
    }
}

impl From<String> for WidgetKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "app-shortcut" => WidgetKind::AppShortcut,
            "group" => WidgetKind::Group,
            "weather" => WidgetKind::Weather,
            "date-time" => WidgetKind::DateTime,
            "system-monitor" => WidgetKind::SystemMonitor,
            "disk-monitor" => WidgetKind::DiskMonitor,
            "torrent-client" => WidgetKind::TorrentClient,
            "media-server" => WidgetKind::MediaServer,
            "dns-blocker" => WidgetKind::DnsBlocker,
            "notes" => WidgetKind::Notes,
            _ => WidgetKind::Other(tag),
        }
    }
}

impl From<WidgetKind> for String {
    fn from(kind: WidgetKind) -> Self {
        match kind {
            WidgetKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

/// Default span and resize bounds for a widget kind, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetSize {
    pub w: i32,
    pub h: i32,
    pub min_w: i32,
    pub max_w: i32,
    pub min_h: i32,
    pub max_h: i32,
}

impl WidgetSize {
    const fn new(w: i32, h: i32, min_w: i32, max_w: i32, min_h: i32, max_h: i32) -> Self {
        Self {
            w,
            h,
            min_w,
            max_w,
            min_h,
            max_h,
        }
    }
}

/// Size used for any kind without its own registry entry.
pub const FALLBACK_SIZE: WidgetSize = WidgetSize::new(4, 2, 2, 12, 1, 6);

/// Look up the default size for a widget kind
pub fn widget_size(kind: &WidgetKind) -> WidgetSize {
    match kind {
        WidgetKind::AppShortcut => WidgetSize::new(2, 2, 1, 4, 1, 4),
        WidgetKind::Group => WidgetSize::new(6, 3, 3, 12, 2, 8),
        WidgetKind::Weather => WidgetSize::new(4, 2, 2, 6, 2, 4),
        WidgetKind::DateTime => WidgetSize::new(3, 1, 2, 6, 1, 2),
        WidgetKind::SystemMonitor => WidgetSize::new(4, 3, 3, 8, 2, 6),
        WidgetKind::DiskMonitor => WidgetSize::new(4, 2, 3, 8, 1, 4),
        WidgetKind::TorrentClient => WidgetSize::new(6, 3, 4, 12, 2, 8),
        WidgetKind::MediaServer => WidgetSize::new(6, 3, 4, 12, 2, 8),
        WidgetKind::DnsBlocker => WidgetSize::new(4, 2, 3, 6, 2, 4),
        WidgetKind::Notes => WidgetSize::new(4, 3, 2, 12, 2, 8),
        WidgetKind::Other(_) => FALLBACK_SIZE,
    }
}
