//! Initial SETTINGS announced in the server preface (RFC 7540 Section
//! 6.5.1).

/// SETTINGS identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum SettingId {
    HeaderTableSize = 0x1,
    EnablePush = 0x2,
    MaxConcurrentStreams = 0x3,
    InitialWindowSize = 0x4,
    MaxFrameSize = 0x5,
    MaxHeaderListSize = 0x6,
}

/// A single SETTINGS entry handed to the engine with the preface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Setting {
    pub id: SettingId,
    pub value: u32,
}

/// Settings the server announces when the session opens. Unset fields are
/// not announced and keep their protocol defaults.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// SETTINGS_MAX_CONCURRENT_STREAMS (0x3).
    pub max_concurrent_streams: Option<u32>,
    /// SETTINGS_INITIAL_WINDOW_SIZE (0x4). Protocol default 65535.
    pub initial_window_size: Option<u32>,
    /// SETTINGS_MAX_FRAME_SIZE (0x5). Protocol default 16384.
    pub max_frame_size: Option<u32>,
    /// SETTINGS_MAX_HEADER_LIST_SIZE (0x6).
    pub max_header_list_size: Option<u32>,
}

impl Settings {
    /// Server defaults: cap concurrent streams at 100.
    pub fn server_default() -> Self {
        Self {
            max_concurrent_streams: Some(100),
            ..Default::default()
        }
    }

    /// The entry list submitted with the preface.
    pub fn entries(&self) -> Vec<Setting> {
        let mut entries = Vec::new();
        if let Some(value) = self.max_concurrent_streams {
            entries.push(Setting {
                id: SettingId::MaxConcurrentStreams,
                value,
            });
        }
        if let Some(value) = self.initial_window_size {
            entries.push(Setting {
                id: SettingId::InitialWindowSize,
                value,
            });
        }
        if let Some(value) = self.max_frame_size {
            entries.push(Setting {
                id: SettingId::MaxFrameSize,
                value,
            });
        }
        if let Some(value) = self.max_header_list_size {
            entries.push(Setting {
                id: SettingId::MaxHeaderListSize,
                value,
            });
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_default_announces_stream_limit() {
        let entries = Settings::server_default().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, SettingId::MaxConcurrentStreams);
        assert_eq!(entries[0].value, 100);
    }

    #[test]
    fn unset_fields_are_not_announced() {
        assert!(Settings::default().entries().is_empty());
    }

    #[test]
    fn set_fields_appear_with_their_values() {
        let settings = Settings {
            max_concurrent_streams: Some(32),
            initial_window_size: Some(1 << 20),
            ..Default::default()
        };
        let entries = settings.entries();
        assert_eq!(entries.len(), 2);
        assert!(entries.contains(&Setting {
            id: SettingId::InitialWindowSize,
            value: 1 << 20,
        }));
    }
}
